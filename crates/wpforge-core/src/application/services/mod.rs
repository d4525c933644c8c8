//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "resolve the config" or "create the project".

pub mod config_service;
pub mod scaffold_service;

pub use config_service::ConfigService;
pub use scaffold_service::{ScaffoldPorts, ScaffoldReport, ScaffoldService, Step, StepOutcome};
