//! Infrastructure adapters for wpforge.
//!
//! This crate implements the ports defined in `wpforge-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod process;
pub mod renderer;
pub mod template_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{DEFAULT_TIMEOUT, RecordingRunner, ShellRunner};
pub use renderer::MustacheRenderer;
pub use template_store::{FilesystemTemplateStore, InMemoryTemplateStore};
