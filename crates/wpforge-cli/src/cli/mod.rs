//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! and help text.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "wpforge",
    bin_name = "wpforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "WordPress project scaffolding",
    long_about = "wpforge turns a project.yml into a Bedrock-based WordPress project \
                  with a starter plugin, a starter theme and helper scripts.",
    after_help = "EXAMPLES:\n\
        \x20 wpforge config create\n\
        \x20 wpforge project create --set project.title=\"Acme Site\"\n\
        \x20 wpforge plugin create \"Acme Blocks\"\n\
        \x20 wpforge completions bash > /usr/share/bash-completion/completions/wpforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the project configuration file.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 wpforge config create\n\
            \x20 wpforge config display --set project.title=\"Acme Site\"\n\
            \x20 wpforge config save"
    )]
    Config(ConfigCommands),

    /// Install front-end and PHP dependencies.
    #[command(about = "Dependency management", subcommand)]
    Deps(DepsCommands),

    /// Scaffold the whole project.
    #[command(
        about = "Project scaffolding",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 wpforge project create\n\
            \x20 wpforge -d ../acme project create --set repo.create=true"
    )]
    Project(ProjectCommands),

    /// Scaffold a plugin inside an existing project.
    #[command(
        about = "Plugin scaffolding",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 wpforge plugin create \"Acme Blocks\"\n\
            \x20 wpforge plugin create-tests \"Acme Blocks\""
    )]
    Plugin(ArtifactCommands),

    /// Scaffold a theme inside an existing project.
    #[command(
        about = "Theme scaffolding",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 wpforge theme create \"Acme Theme\"\n\
            \x20 wpforge theme create-tests"
    )]
    Theme(ArtifactCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 wpforge completions bash > ~/.local/share/bash-completion/completions/wpforge\n\
            \x20 wpforge completions zsh  > ~/.zfunc/_wpforge\n\
            \x20 wpforge completions fish > ~/.config/fish/completions/wpforge.fish"
    )]
    Completions(CompletionsArgs),
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `wpforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write the default project.yml if none exists.
    Create {
        /// Replace an existing file with the defaults.
        #[arg(short = 'f', long = "force", help = "Overwrite an existing project.yml")]
        force: bool,

        /// Skip the overwrite confirmation.
        #[arg(short = 'y', long = "yes", help = "Do not ask before overwriting")]
        yes: bool,
    },
    /// Print the fully resolved configuration as YAML.
    Display,
    /// Write the resolved configuration (generated secrets included) back to project.yml.
    Save,
    /// Print the path of the project.yml in use.
    Path,
}

// ── deps subcommands ──────────────────────────────────────────────────────────

/// Subcommands for `wpforge deps`.
#[derive(Debug, Subcommand)]
pub enum DepsCommands {
    /// Install dependencies for one part of the project.
    Install {
        /// Which part of the project (project, bedrock, plugin, theme, ...).
        #[arg(
            short = 't',
            long = "type",
            value_name = "TYPE",
            default_value = "project",
            help = "Context to install dependencies for"
        )]
        kind: String,
    },
}

// ── project subcommands ───────────────────────────────────────────────────────

/// Subcommands for `wpforge project`.
#[derive(Debug, Subcommand)]
pub enum ProjectCommands {
    /// Run every scaffold step in order; finished steps are skipped.
    Create,
}

// ── plugin / theme subcommands ────────────────────────────────────────────────

/// Subcommands shared by `wpforge plugin` and `wpforge theme`.
#[derive(Debug, Subcommand)]
pub enum ArtifactCommands {
    /// Scaffold the artifact from its template group.
    Create(ArtifactArgs),
    /// Add a test suite to an existing artifact.
    #[command(name = "create-tests")]
    CreateTests(ArtifactArgs),
}

/// Arguments for plugin/theme commands.
#[derive(Debug, Args)]
pub struct ArtifactArgs {
    /// Display name; overrides `plugin.name` / `theme.name` from the config.
    #[arg(value_name = "NAME", help = "Name (default: from project.yml)")]
    pub name: Option<String>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `wpforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_project_create() {
        let cli = Cli::parse_from(["wpforge", "project", "create"]);
        assert!(matches!(
            cli.command,
            Commands::Project(ProjectCommands::Create)
        ));
    }

    #[test]
    fn set_is_repeatable_and_global() {
        let cli = Cli::parse_from([
            "wpforge",
            "config",
            "display",
            "--set",
            "project.title=Acme Site",
            "-s",
            "vvv=true",
        ]);
        assert_eq!(cli.global.set.len(), 2);
        assert_eq!(cli.global.set[0].0, "project.title");
        assert_eq!(cli.global.set[1].1, serde_yaml::Value::Bool(true));
    }

    #[test]
    fn invalid_set_is_a_parse_error() {
        let result = Cli::try_parse_from(["wpforge", "--set", "no-equals", "config", "path"]);
        assert!(result.is_err());
    }

    #[test]
    fn plugin_name_is_optional() {
        let cli = Cli::parse_from(["wpforge", "plugin", "create"]);
        match cli.command {
            Commands::Plugin(ArtifactCommands::Create(args)) => assert!(args.name.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["wpforge", "theme", "create-tests", "Acme Theme"]);
        match cli.command {
            Commands::Theme(ArtifactCommands::CreateTests(args)) => {
                assert_eq!(args.name.as_deref(), Some("Acme Theme"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn deps_type_defaults_to_project() {
        let cli = Cli::parse_from(["wpforge", "deps", "install"]);
        match cli.command {
            Commands::Deps(DepsCommands::Install { kind }) => assert_eq!(kind, "project"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn timeout_must_be_positive() {
        assert!(Cli::try_parse_from(["wpforge", "--timeout", "0", "project", "create"]).is_err());
        let cli = Cli::parse_from(["wpforge", "--timeout", "30", "project", "create"]);
        assert_eq!(cli.global.timeout, 30);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["wpforge", "--quiet", "--verbose", "config", "path"]);
        assert!(result.is_err());
    }
}
