//! `wpforge config`: create, inspect and persist `project.yml`.

use tracing::{info, instrument};
use wpforge_core::prelude::{ConfigService, ProjectConfig};

use crate::{
    cli::{ConfigCommands, OutputFormat},
    config::AppContext,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
#[instrument(skip_all)]
pub fn execute(cmd: ConfigCommands, ctx: AppContext, mut output: OutputManager) -> CliResult<()> {
    let path = ctx.paths.config.clone();

    match cmd {
        ConfigCommands::Create { force, yes } => {
            if force && path.is_file() && !yes && !confirm_overwrite(&path, &output)? {
                return Err(CliError::Cancelled);
            }

            if ctx.config_service().create_config_file(force)? {
                info!(path = %path.display(), "Config file created");
                output.success(&format!("Created {}", path.display()))?;
            } else {
                output.warning(&format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ))?;
            }
        }

        ConfigCommands::Display => {
            let config = ctx.resolve_config()?;
            output.enable_debug(config.debug);
            output.debug(&format!("config file: {}", path.display()))?;
            output.data(&render(&config, output.format())?)?;
        }

        ConfigCommands::Save => {
            let config = ctx.resolve_config()?;
            ctx.config_service().save_config(&config)?;
            output.success(&format!("Saved resolved config to {}", path.display()))?;
        }

        ConfigCommands::Path => {
            output.data(&path.display().to_string())?;
        }
    }

    Ok(())
}

fn render(config: &ProjectConfig, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(config).map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })
        }
        _ => Ok(ConfigService::to_yaml(config)?),
    }
}

#[cfg(feature = "interactive")]
fn confirm_overwrite(path: &std::path::Path, output: &OutputManager) -> CliResult<bool> {
    use std::io::IsTerminal;

    use dialoguer::{Confirm, theme::ColorfulTheme};

    if !std::io::stdin().is_terminal() || output.is_quiet() {
        return Ok(true);
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "Replace {} with the defaults? Generated secrets will be lost",
            path.display()
        ))
        .default(false)
        .interact()
        .map_err(|e| match e {
            dialoguer::Error::IO(source) => CliError::IoError {
                message: "failed to read confirmation input".into(),
                source,
            },
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm_overwrite(_path: &std::path::Path, _output: &OutputManager) -> CliResult<bool> {
    Ok(true)
}
