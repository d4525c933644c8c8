//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `wpforge-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ForgeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `wpforge_adapters::filesystem::LocalFilesystem` (production)
/// - `wpforge_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if a path exists (file, directory, or symlink).
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()>;

    fn read_to_string(&self, path: &Path) -> ForgeResult<String>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()>;

    fn remove_file(&self, path: &Path) -> ForgeResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()>;

    fn copy_file(&self, from: &Path, to: &Path) -> ForgeResult<()>;

    /// Recursively copy `from` into `to`, creating `to` if needed.
    fn copy_dir_all(&self, from: &Path, to: &Path) -> ForgeResult<()>;

    /// Create `link` pointing at `original`.
    ///
    /// Returns `false` without touching anything when `link` already exists.
    fn symlink(&self, original: &Path, link: &Path) -> ForgeResult<bool>;

    /// Immediate children of a directory, sorted by path.
    fn list_dir(&self, path: &Path) -> ForgeResult<Vec<PathBuf>>;
}

/// One file of a template group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the group root; may itself contain placeholders.
    pub path: PathBuf,
    pub content: String,
}

impl TemplateFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Port for template storage and retrieval.
///
/// Implemented by:
/// - `wpforge_adapters::template_store::FilesystemTemplateStore` (templates on disk)
/// - `wpforge_adapters::template_store::InMemoryTemplateStore` (testing)
pub trait TemplateStore: Send + Sync {
    /// Load every file of a named group (`scripts`, `plugin`, ...).
    fn load_group(&self, group: &str) -> ForgeResult<Vec<TemplateFile>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `wpforge_adapters::renderer::MustacheRenderer`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` against `data`.
    fn render(&self, template: &str, data: &serde_json::Value) -> ForgeResult<String>;
}

/// An external program invocation (no shell involved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Port for running external programs (git, composer, npm, bower).
///
/// Implemented by:
/// - `wpforge_adapters::process::ShellRunner` (production, with timeout)
/// - `wpforge_adapters::process::RecordingRunner` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner: Send + Sync {
    /// Run `command` in `cwd` and wait for it to finish successfully.
    fn run(&self, command: &ExternalCommand, cwd: &Path) -> ForgeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_command_display_quotes_spaced_args() {
        let cmd = ExternalCommand::new("git", ["commit", "-m", "initial commit"]);
        assert_eq!(cmd.to_string(), "git commit -m \"initial commit\"");
    }

    #[test]
    fn external_command_without_args() {
        assert_eq!(ExternalCommand::new("ls", Vec::<String>::new()).to_string(), "ls");
    }
}
