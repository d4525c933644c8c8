//! wpforge Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the wpforge
//! WordPress scaffolding tool, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           wpforge-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (ConfigService, ScaffoldService)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Store, Render, Process)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     wpforge-adapters (Infrastructure)   │
//! └─────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (ProjectConfig, derivation, paths)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wpforge_core::prelude::*;
//!
//! # fn run(fs: std::sync::Arc<dyn Filesystem>, paths: ProjectPaths) -> ForgeResult<()> {
//! let service = ConfigService::new(fs, paths);
//! let config = service.load_config(None, &RawConfig::empty())?;
//! println!("{}", config.project.slug);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ConfigService, ScaffoldPorts, ScaffoldReport, ScaffoldService, Step, StepOutcome,
        ports::{
            ExternalCommand, Filesystem, ProcessRunner, TemplateFile, TemplateRenderer,
            TemplateStore,
        },
    };
    pub use crate::domain::{
        ArtifactKind, ContextKind, ProjectConfig, ProjectPaths, RawConfig, TemplateData,
    };
    pub use crate::error::{ForgeError, ForgeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
