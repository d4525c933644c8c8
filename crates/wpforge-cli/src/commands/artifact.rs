//! `wpforge plugin ...` and `wpforge theme ...`.

use tracing::instrument;
use wpforge_core::prelude::{ArtifactKind, ScaffoldReport, Step, StepOutcome};

use crate::{
    cli::{ArtifactCommands, OutputFormat},
    commands::project::{finish, show_report},
    config::AppContext,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(kind = kind.as_str()))]
pub fn execute(
    kind: ArtifactKind,
    cmd: ArtifactCommands,
    mut ctx: AppContext,
    mut output: OutputManager,
) -> CliResult<()> {
    let (args, tests) = match cmd {
        ArtifactCommands::Create(args) => (args, false),
        ArtifactCommands::CreateTests(args) => (args, true),
    };

    if let Some(name) = args.name {
        if name.trim().is_empty() {
            return Err(CliError::InvalidInput {
                message: format!("{kind} name must not be empty"),
            });
        }
        ctx.set_override(&format!("{}.name", kind.as_str()), name)?;
    }

    let config = ctx.resolve_config()?;
    output.enable_debug(config.debug);
    let name = config.artifact(kind).name.clone();

    let service = ctx.scaffold_service(config, &output)?;
    let (step, outcome) = match (kind, tests) {
        (ArtifactKind::Plugin, false) => (Step::Plugin, service.create_plugin()?),
        (ArtifactKind::Theme, false) => (Step::Theme, service.create_theme()?),
        (ArtifactKind::Plugin, true) => (Step::PluginTests, service.create_plugin_tests()?),
        (ArtifactKind::Theme, true) => (Step::ThemeTests, service.create_theme_tests()?),
    };

    if let Some(base) = service.base_path(&kind.into()) {
        output.debug(&format!("{}: {}", kind.as_str(), base.display()))?;
    }

    if output.format() == OutputFormat::Json {
        let mut report = ScaffoldReport::default();
        report.push(step, outcome);
        show_report(&report, &output)?;
        return finish(&report);
    }

    match outcome {
        StepOutcome::Performed => output.success(&format!("{step} '{name}' created")),
        StepOutcome::Skipped(reason) => output.warning(&format!("{step}: skipped ({reason})")),
        StepOutcome::Failed(_) => {
            return Err(CliError::StepsFailed {
                failed: vec![step.to_string()],
            });
        }
    }?;

    Ok(())
}
