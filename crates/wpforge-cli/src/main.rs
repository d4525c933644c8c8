//! # wpforge CLI
//!
//! WordPress project scaffolding.
//!
//! ## Startup sequence
//!
//! 1. Load `.env`, then parse CLI arguments (clap handles `--help` / `--version`).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Resolve paths and `--set` overrides into an [`AppContext`].
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                              |
//! |------|--------------------------------------|
//! |  0   | Success                              |
//! |  1   | Internal / I/O error, failed steps   |
//! |  2   | User / input error                   |
//! |  3   | Resource not found                   |
//! |  4   | Configuration error                  |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};
use wpforge_core::prelude::ArtifactKind;

use crate::{
    cli::{Cli, Commands},
    config::AppContext,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // Missing .env is the normal case.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, with a success exit code.
            let _ = e.print();
            return ExitCode::from(e.exit_code().clamp(0, 255) as u8);
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    let _log_guard = match init_logging(&cli.global) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        overrides = cli.global.set.len(),
        "CLI started"
    );

    let verbose = cli.global.verbose > 0;
    let colored = !cli.global.no_color;

    match run(cli) {
        Ok(()) => {
            info!("wpforge completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose, colored),
    }
}

/// Build the context and dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli) -> CliResult<()> {
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    // ── 3. Resolve context ────────────────────────────────────────────────
    let ctx = AppContext::load(&cli.global)?;

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global);

    // ── 5. Dispatch ───────────────────────────────────────────────────────
    match cli.command {
        Commands::Config(cmd) => commands::config::execute(cmd, ctx, output),
        Commands::Deps(cmd) => commands::deps::execute(cmd, ctx, output),
        Commands::Project(cmd) => commands::project::execute(cmd, ctx, output),
        Commands::Plugin(cmd) => commands::artifact::execute(ArtifactKind::Plugin, cmd, ctx, output),
        Commands::Theme(cmd) => commands::artifact::execute(ArtifactKind::Theme, cmd, ctx, output),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Translate a `CliError` into a user message and an appropriate exit code.
fn handle_error(err: CliError, verbose: bool, colored: bool) -> ExitCode {
    err.log();

    // stderr so the message survives a redirected stdout.
    let msg = if colored && std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
