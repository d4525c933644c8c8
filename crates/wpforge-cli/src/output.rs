//! Output management and formatting.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use wpforge_core::prelude::{ExternalCommand, ForgeResult, ProcessRunner, StepOutcome};

use crate::cli::global::{GlobalArgs, OutputFormat};

/// Manages CLI output based on flags and the resolved config.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    debug: bool,
    /// Payload stream.
    term: Term,
    /// Human-facing lines; stderr when stdout carries JSON.
    messages: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags.
    pub fn new(args: &GlobalArgs) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color || resolved_format != OutputFormat::Human,
            debug: args.verbose >= 2,
            term: Term::stdout(),
            messages: if resolved_format == OutputFormat::Json {
                Term::stderr()
            } else {
                Term::stdout()
            },
        }
    }

    /// Turn on debug lines, e.g. when the project config sets `debug: true`.
    pub fn enable_debug(&mut self, on: bool) {
        self.debug |= on;
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.messages.write_line(msg)
    }

    /// Command payload (YAML, JSON, a path).  Never suppressed: it is the
    /// point of the command.  The only writer to stdout in JSON mode.
    pub fn data(&self, payload: &str) -> io::Result<()> {
        self.term.write_line(payload.trim_end_matches('\n'))
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.messages.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  *Not* suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.messages.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.messages.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.messages.write_line(&line)
    }

    /// Dimmed line shown only with `-vv` or `debug: true`.
    pub fn debug(&self, msg: &str) -> io::Result<()> {
        if self.quiet || !self.debug {
            return Ok(());
        }
        let line = if self.no_color {
            format!("  {msg}")
        } else {
            format!("  {}", msg.dimmed())
        };
        self.messages.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.messages.write_line(&line)
    }

    /// One line per scaffold step, styled by outcome.
    pub fn outcome(&self, label: &str, outcome: &StepOutcome) -> io::Result<()> {
        match outcome {
            StepOutcome::Performed => self.success(label),
            StepOutcome::Skipped(reason) => self.info(&format!("{label}: skipped ({reason})")),
            StepOutcome::Failed(reason) => self.error(&format!("{label}: {reason}")),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// `true` when debug lines are shown.
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    /// `true` when a spinner can be drawn without garbling piped output.
    pub fn is_interactive(&self) -> bool {
        !self.quiet && self.resolved_format == OutputFormat::Human && io::stderr().is_terminal()
    }
}

/// [`ProcessRunner`] decorator that shows a spinner while a command runs.
pub struct SpinnerRunner {
    inner: Arc<dyn ProcessRunner>,
    enabled: bool,
}

impl SpinnerRunner {
    pub fn new(inner: Arc<dyn ProcessRunner>, enabled: bool) -> Self {
        Self { inner, enabled }
    }

    fn spinner(&self, command: &ExternalCommand) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}") {
            bar.set_style(style);
        }
        bar.set_message(command.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }
}

impl ProcessRunner for SpinnerRunner {
    fn run(&self, command: &ExternalCommand, cwd: &Path) -> ForgeResult<()> {
        let bar = self.spinner(command);
        let result = self.inner.run(command, cwd);
        bar.finish_and_clear();
        result
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    fn make_manager(quiet: bool, no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            quiet,
            no_color,
            output_format: OutputFormat::Human,
            ..GlobalArgs::default()
        };
        OutputManager::new(&args)
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true);
        assert!(out.print("hello").is_ok());
        assert!(out.is_quiet());
    }

    #[test]
    fn error_not_suppressed_in_quiet_mode() {
        let out = make_manager(true, true);
        assert!(out.error("something went wrong").is_ok());
    }

    #[test]
    fn no_color_flag_reported() {
        assert!(make_manager(false, false).supports_color());
        assert!(!make_manager(false, true).supports_color());
    }

    #[test]
    fn plain_format_disables_color() {
        let args = GlobalArgs {
            output_format: OutputFormat::Plain,
            ..GlobalArgs::default()
        };
        let out = OutputManager::new(&args);
        assert_eq!(out.format(), OutputFormat::Plain);
        assert!(!out.supports_color());
    }

    #[test]
    fn debug_gate_follows_verbosity_or_config() {
        let mut out = make_manager(false, true);
        assert!(!out.is_debug());
        out.enable_debug(false);
        assert!(!out.is_debug());
        out.enable_debug(true);
        assert!(out.is_debug());

        let args = GlobalArgs {
            verbose: 2,
            ..GlobalArgs::default()
        };
        assert!(OutputManager::new(&args).is_debug());
    }

    #[derive(Default)]
    struct Seen(Mutex<Vec<String>>);

    impl ProcessRunner for Seen {
        fn run(&self, command: &ExternalCommand, _cwd: &Path) -> ForgeResult<()> {
            self.0.lock().unwrap().push(command.to_string());
            Ok(())
        }
    }

    #[test]
    fn spinner_delegates_to_inner_runner() {
        let inner = Arc::new(Seen::default());
        let runner = SpinnerRunner::new(inner.clone(), false);

        runner
            .run(&ExternalCommand::new("npm", ["install"]), Path::new("."))
            .unwrap();

        assert_eq!(*inner.0.lock().unwrap(), vec!["npm install".to_string()]);
    }
}
