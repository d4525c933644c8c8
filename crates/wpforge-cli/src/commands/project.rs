//! `wpforge project create`: run every scaffold step in order.

use serde::Serialize;
use tracing::{info, instrument};
use wpforge_core::{
    domain::DomainError,
    prelude::{ScaffoldReport, StepOutcome},
};

use crate::{
    cli::{OutputFormat, ProjectCommands},
    config::AppContext,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(cmd: ProjectCommands, ctx: AppContext, mut output: OutputManager) -> CliResult<()> {
    match cmd {
        ProjectCommands::Create => create(ctx, &mut output),
    }
}

fn create(ctx: AppContext, output: &mut OutputManager) -> CliResult<()> {
    let config = ctx.resolve_config()?;
    output.enable_debug(config.debug);

    // Checked before init so a missing title leaves the disk untouched.
    if config.project.title.is_empty() {
        return Err(CliError::Core(
            DomainError::MissingRequiredField {
                field: "project.title",
            }
            .into(),
        ));
    }

    output.header(&format!(
        "Creating '{}' in {}",
        config.project.title,
        ctx.paths.project.display()
    ))?;
    output.debug(&format!("resources: {}", ctx.paths.root.display()))?;

    let mut service = ctx.scaffold_service(config, output)?;
    let report = service.create_project()?;

    show_report(&report, output)?;
    finish(&report)?;

    info!(project = %ctx.paths.project.display(), "Project ready");
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", ctx.paths.project.display()))?;
    output.print("  wpforge config save   # keep the generated secrets")?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct StepRecord<'a> {
    step: &'static str,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

fn records(report: &ScaffoldReport) -> Vec<StepRecord<'_>> {
    report
        .steps()
        .iter()
        .map(|(step, outcome)| {
            let (label, detail) = match outcome {
                StepOutcome::Performed => ("performed", None),
                StepOutcome::Skipped(reason) => ("skipped", Some(reason.as_str())),
                StepOutcome::Failed(reason) => ("failed", Some(reason.as_str())),
            };
            StepRecord {
                step: step.as_str(),
                outcome: label,
                detail,
            }
        })
        .collect()
}

/// Print every step outcome in the selected format.
pub(crate) fn show_report(report: &ScaffoldReport, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&records(report)).map_err(|e| {
            CliError::ConfigError {
                message: format!("Failed to serialise report: {e}"),
                source: Some(Box::new(e)),
            }
        })?;
        output.data(&json)?;
        return Ok(());
    }

    for (step, outcome) in report.steps() {
        output.outcome(step.as_str(), outcome)?;
    }
    Ok(())
}

/// Turn failed steps into the exit status.
pub(crate) fn finish(report: &ScaffoldReport) -> CliResult<()> {
    let failed: Vec<String> = report
        .steps()
        .iter()
        .filter(|(_, outcome)| outcome.is_failed())
        .map(|(step, _)| step.to_string())
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::StepsFailed { failed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wpforge_core::prelude::Step;

    fn report() -> ScaffoldReport {
        let mut report = ScaffoldReport::default();
        report.push(Step::ProjectFiles, StepOutcome::Performed);
        report.push(Step::Repo, StepOutcome::Skipped("repo.create is off".into()));
        report.push(Step::Theme, StepOutcome::Failed("'npm install' failed".into()));
        report
    }

    #[test]
    fn records_carry_outcome_and_detail() {
        let report = report();
        let json = serde_json::to_value(records(&report)).unwrap();

        assert_eq!(json[0]["step"], "project files");
        assert_eq!(json[0]["outcome"], "performed");
        assert!(json[0].get("detail").is_none());
        assert_eq!(json[1]["outcome"], "skipped");
        assert_eq!(json[2]["detail"], "'npm install' failed");
    }

    #[test]
    fn failed_steps_become_an_error() {
        match finish(&report()) {
            Err(CliError::StepsFailed { failed }) => assert_eq!(failed, vec!["theme"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn clean_report_finishes_ok() {
        let mut report = ScaffoldReport::default();
        report.push(Step::Plugin, StepOutcome::Performed);
        assert!(finish(&report).is_ok());
    }
}
