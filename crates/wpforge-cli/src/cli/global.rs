//! Global arguments that apply to every subcommand.
//!
//! Declared here and flattened into [`super::Cli`] so that `-v`, `-q`, `--set`
//! etc. are available on any invocation without repetition.

use std::path::PathBuf;

use clap::Args;
use wpforge_core::prelude::RawConfig;

/// Global arguments for all commands.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity.
    ///
    /// Pass once for INFO (`-v`), twice for DEBUG (`-vv`), three times for
    /// TRACE (`-vvv`).  Conflicts with `--quiet`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Only warnings and errors
    -v      - Info level (progress messages)
    -vv     - Debug level (command output, resolved paths)
    -vvv    - Trace level (very verbose)"
    )]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Disable ANSI colour codes.
    ///
    /// Automatically honoured when `NO_COLOR` is set in the environment
    /// (see <https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Explicit project config file, read before the discovered `project.yml`.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Project config file (default: nearest project.yml)"
    )]
    pub config: Option<PathBuf>,

    /// Project directory; defaults to the directory holding the discovered
    /// `project.yml`, or the current directory.
    #[arg(
        short = 'd',
        long = "dir",
        global = true,
        value_name = "DIR",
        help = "Project directory"
    )]
    pub dir: Option<PathBuf>,

    /// Override a config value, e.g. `--set project.title="Acme Site"`.
    ///
    /// `true`/`false` set booleans (`--set repo.create=true`); any other
    /// value is taken as written.
    #[arg(
        short = 's',
        long = "set",
        global = true,
        value_name = "KEY=VALUE",
        value_parser = parse_override,
        action = clap::ArgAction::Append,
        help = "Override a config value (repeatable)"
    )]
    pub set: Vec<(String, serde_yaml::Value)>,

    /// Time budget for each external command, in seconds.
    #[arg(
        long = "timeout",
        global = true,
        value_name = "SECS",
        default_value_t = 600,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Timeout for external commands in seconds"
    )]
    pub timeout: u64,

    /// Also write logs (without colour) to this file.
    #[arg(
        long = "log-file",
        global = true,
        value_name = "FILE",
        help = "Write logs to a file"
    )]
    pub log_file: Option<PathBuf>,

    /// Machine-readable output format.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

impl Default for GlobalArgs {
    fn default() -> Self {
        Self {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            dir: None,
            set: Vec::new(),
            timeout: 600,
            log_file: None,
            output_format: OutputFormat::Auto,
        }
    }
}

/// How the CLI should render its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Human-readable with colors.
    Human,
    /// Plain text without colors.
    Plain,
    /// JSON output.
    Json,
}

fn parse_override(s: &str) -> Result<(String, serde_yaml::Value), String> {
    RawConfig::parse_assignment(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_booleans_are_typed() {
        let (key, value) = parse_override("repo.create=true").unwrap();
        assert_eq!(key, "repo.create");
        assert_eq!(value, serde_yaml::Value::Bool(true));
    }

    #[test]
    fn override_numbers_stay_text() {
        let (_, value) = parse_override("db.pass=007").unwrap();
        assert_eq!(value, serde_yaml::Value::String("007".into()));
    }

    #[test]
    fn override_without_equals_is_rejected() {
        assert!(parse_override("project.title").is_err());
    }
}
