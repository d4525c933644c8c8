//! Application layer errors.
//!
//! These errors represent failures at the edges (files, templates,
//! subprocesses, config parsing), not violations of domain rules.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during config loading and scaffold orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The config file exists but is not valid YAML (or not a mapping).
    #[error("Failed to parse {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    /// The config could not be serialised back to YAML.
    #[error("Failed to serialise config: {reason}")]
    ConfigSerialize { reason: String },

    /// Template rendering failed.
    #[error("Template rendering failed for {template}: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// A template group directory does not exist.
    #[error("Template group '{group}' not found at {path}")]
    TemplateGroupNotFound { group: String, path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A plugin or theme must exist before this operation.
    #[error("{artifact} '{name}' does not exist at {path}")]
    ArtifactMissing {
        artifact: &'static str,
        name: String,
        path: PathBuf,
    },

    /// An external command could not be started.
    #[error("Failed to start '{command}': {reason}")]
    CommandSpawn { command: String, reason: String },

    /// An external command exited unsuccessfully.
    #[error("'{command}' failed with {status}")]
    CommandFailed { command: String, status: String },

    /// An external command exceeded its time budget and was killed.
    #[error("'{command}' timed out after {timeout:?}")]
    CommandTimedOut { command: String, timeout: Duration },

    /// Shared adapter state was poisoned.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigParse { path, .. } => vec![
                format!("Fix the YAML syntax in {}", path.display()),
                "Or recreate it with: wpforge config create --force".into(),
            ],
            Self::TemplateGroupNotFound { path, .. } => vec![
                format!("Expected templates under {}", path.display()),
                "Set WPFORGE_RESOURCES_DIR to the directory holding templates/ and assets/"
                    .into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::ArtifactMissing { artifact, .. } => vec![
                format!("Create the {artifact} first: wpforge {artifact} create"),
            ],
            Self::CommandSpawn { command, .. } => vec![
                format!("Ensure '{}' is installed and in your PATH", program_of(command)),
            ],
            Self::CommandFailed { .. } => vec![
                "Check the command output above for details".into(),
                "Every step is idempotent: fix the cause and run the command again".into(),
            ],
            Self::CommandTimedOut { .. } => vec![
                "Raise the limit with --timeout <SECONDS>".into(),
                "Check network access for package managers".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigParse { .. } | Self::ConfigSerialize { .. } => ErrorCategory::Configuration,
            Self::TemplateGroupNotFound { .. } | Self::ArtifactMissing { .. } => {
                ErrorCategory::NotFound
            }
            Self::RenderingFailed { .. }
            | Self::FilesystemError { .. }
            | Self::CommandSpawn { .. }
            | Self::CommandFailed { .. }
            | Self::CommandTimedOut { .. }
            | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}

fn program_of(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or(command)
}
