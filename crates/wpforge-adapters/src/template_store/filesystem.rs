//! Filesystem-based template store.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── plugin/
//! │   ├── {{plugin.slug}}.php       ← path is rendered too
//! │   └── includes/
//! │       └── class-{{plugin.id}}.php
//! ├── theme/
//! │   └── style.css
//! └── scripts/
//!     └── deploy.sh
//! ```
//!
//! Each top-level directory is one group. Every regular file below it becomes
//! a [`TemplateFile`] whose path is relative to the group directory, with
//! forward slashes.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use wpforge_core::{
    application::{
        ApplicationError,
        ports::{TemplateFile, TemplateStore},
    },
    error::ForgeResult,
};

/// Loads template groups from a directory on disk.
#[derive(Debug, Clone)]
pub struct FilesystemTemplateStore {
    templates_dir: PathBuf,
}

impl FilesystemTemplateStore {
    /// Create a store rooted at `templates_dir`.
    ///
    /// The directory does not need to exist yet; loading a group from a
    /// missing root fails with [`ApplicationError::TemplateGroupNotFound`].
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}

impl TemplateStore for FilesystemTemplateStore {
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    fn load_group(&self, group: &str) -> ForgeResult<Vec<TemplateFile>> {
        let dir = self.templates_dir.join(group);
        if !dir.is_dir() {
            return Err(ApplicationError::TemplateGroupNotFound {
                group: group.to_string(),
                path: dir,
            }
            .into());
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: dir.clone(),
                reason: format!("directory walk error: {e}"),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let abs_path = entry.path();
            let rel = abs_path
                .strip_prefix(&dir)
                .map_err(|_| ApplicationError::FilesystemError {
                    path: abs_path.to_path_buf(),
                    reason: format!("not under {}", dir.display()),
                })?;

            let content =
                fs::read_to_string(abs_path).map_err(|e| ApplicationError::FilesystemError {
                    path: abs_path.to_path_buf(),
                    reason: format!("failed to read template: {e}"),
                })?;

            files.push(TemplateFile::new(normalize_path(rel), content));
        }

        debug!(group, count = files.len(), "Loaded template group");
        Ok(files)
    }
}

/// Forward slashes on every platform, so rendered paths compare identically.
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
