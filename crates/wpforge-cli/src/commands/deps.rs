//! `wpforge deps install`.
//!
//! Resolves where dependencies would be installed, then reports that the
//! installer itself is not available yet.

use tracing::{debug, instrument};
use wpforge_core::{domain::DomainError, prelude::ContextKind};

use crate::{
    cli::DepsCommands,
    config::AppContext,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(cmd: DepsCommands, ctx: AppContext, mut output: OutputManager) -> CliResult<()> {
    match cmd {
        DepsCommands::Install { kind } => {
            // Parsing never fails; unknown names come back as Unsupported.
            let Ok(kind) = kind.parse::<ContextKind>();
            if !kind.is_supported() {
                return Err(CliError::Core(
                    DomainError::UnsupportedContext(kind.to_string()).into(),
                ));
            }

            let config = ctx.resolve_config()?;
            output.enable_debug(config.debug);

            if let Some(base) = ctx.paths.base_path(&kind, &config) {
                debug!(context = %kind, path = %base.display(), "Dependency target resolved");
                output.debug(&format!("{kind}: {}", base.display()))?;
            }

            Err(CliError::FeatureNotAvailable {
                feature: "deps install",
            })
        }
    }
}
