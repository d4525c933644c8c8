//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `wpforge-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateStore`: Template group retrieval
//!   - `TemplateRenderer`: Template rendering
//!   - `ProcessRunner`: External commands

pub mod output;

pub use output::{
    ExternalCommand, Filesystem, ProcessRunner, TemplateFile, TemplateRenderer, TemplateStore,
};

#[cfg(test)]
pub use output::{MockFilesystem, MockProcessRunner, MockTemplateRenderer};
