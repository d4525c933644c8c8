//! Application layer for wpforge.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ConfigService, ScaffoldService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. Merge and derivation rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ConfigService, ScaffoldPorts, ScaffoldReport, ScaffoldService, Step, StepOutcome,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ExternalCommand, Filesystem, ProcessRunner, TemplateFile, TemplateRenderer, TemplateStore,
};

pub use error::ApplicationError;
