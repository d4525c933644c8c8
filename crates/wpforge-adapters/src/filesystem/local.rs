//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wpforge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ForgeError, ForgeResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        // `symlink_metadata` also sees dangling links.
        path.symlink_metadata().is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read_to_string(&self, path: &Path) -> ForgeResult<String> {
        fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn remove_file(&self, path: &Path) -> ForgeResult<()> {
        fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> ForgeResult<()> {
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> ForgeResult<()> {
        for entry in WalkDir::new(from) {
            let entry = entry.map_err(|e| ForgeError::from(ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: format!("Failed to walk directory: {e}"),
            }))?;

            let rel = entry
                .path()
                .strip_prefix(from)
                .map_err(|_| ApplicationError::FilesystemError {
                    path: entry.path().to_path_buf(),
                    reason: format!("not under {}", from.display()),
                })?;
            let target = to.join(rel);

            if entry.file_type().is_dir() {
                self.create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    self.create_dir_all(parent)?;
                }
                self.copy_file(entry.path(), &target)?;
            }
        }
        Ok(())
    }

    fn symlink(&self, original: &Path, link: &Path) -> ForgeResult<bool> {
        if self.exists(link) {
            return Ok(false);
        }

        #[cfg(unix)]
        let result = std::os::unix::fs::symlink(original, link);
        #[cfg(windows)]
        let result = if original.is_dir() {
            std::os::windows::fs::symlink_dir(original, link)
        } else {
            std::os::windows::fs::symlink_file(original, link)
        };

        result
            .map(|()| true)
            .map_err(|e| map_io_error(link, e, "create symlink"))
    }

    fn list_dir(&self, path: &Path) -> ForgeResult<Vec<PathBuf>> {
        let mut entries = fs::read_dir(path)
            .map_err(|e| map_io_error(path, e, "list directory"))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_io_error(path, e, "read directory entry"))?;
        entries.sort();
        Ok(entries)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ForgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}
