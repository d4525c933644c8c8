//! Core domain layer for wpforge.
//!
//! Pure logic only: the config model and its merge rules, the derivation
//! pipeline, inflection, secret generation, and path conventions. All I/O is
//! reached through ports defined in the application layer.
//!
//! - **No I/O**: no filesystem, network, or subprocess calls
//! - **Values, not singletons**: a resolved [`ProjectConfig`] is passed by
//!   reference to whoever needs it

pub mod config;
pub mod derive;
pub mod error;
pub mod inflect;
pub mod merge;
pub mod paths;
pub mod secrets;
pub mod template_data;

pub use config::{
    AdminConfig, ArtifactConfig, ArtifactKind, AuthorConfig, CONFIG_FILE_NAME, DbConfig,
    ProjectConfig, ProjectInfo, RepoConfig, SecretConfig, TEST_ENV,
};
pub use error::{DomainError, ErrorCategory};
pub use merge::{RawConfig, whitelist_merge};
pub use paths::{BEDROCK_DIR, ContextKind, ProjectPaths};
pub use template_data::{PluginArchive, TemplateData};
