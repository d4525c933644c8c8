//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use wpforge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::ForgeResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep one handle for assertions while the
/// service owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    /// link -> original
    symlinks: BTreeMap<PathBuf, PathBuf>,
}

impl MemoryFilesystemInner {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self.directories.contains(path)
            || self.symlinks.contains_key(path)
    }

    fn add_dir_all(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                self.directories.contains(parent) || self.symlinks.contains_key(parent)
            }
            _ => true,
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories (testing helper).
    pub fn seed_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_dir_all(parent);
            }
            inner.files.insert(path.to_path_buf(), content.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Where `link` points, if it is a symlink.
    pub fn symlink_target(&self, link: impl AsRef<Path>) -> Option<PathBuf> {
        let inner = self.inner.read().ok()?;
        inner.symlinks.get(link.as_ref()).cloned()
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Files under `dir`, relative to it, sorted.
    pub fn files_under(&self, dir: impl AsRef<Path>) -> Vec<PathBuf> {
        let dir = dir.as_ref();
        self.list_files()
            .into_iter()
            .filter_map(|p| p.strip_prefix(dir).ok().map(Path::to_path_buf))
            .collect()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
            inner.symlinks.clear();
        }
    }

    fn read(&self) -> ForgeResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }

    fn write(&self) -> ForgeResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.exists(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| {
                inner.directories.contains(path)
                    || inner
                        .symlinks
                        .get(path)
                        .is_some_and(|target| inner.directories.contains(target))
            })
            .unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path))
            .unwrap_or(false)
    }

    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(not_a(path, "a file exists at this path"));
        }
        inner.add_dir_all(path);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> ForgeResult<String> {
        let inner = self.read()?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_a(path, "file not found"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        let mut inner = self.write()?;

        if !inner.parent_exists(path) {
            return Err(not_a(path, "Parent directory does not exist"));
        }
        if inner.directories.contains(path) {
            return Err(not_a(path, "a directory exists at this path"));
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write()?;
        let removed =
            inner.files.remove(path).is_some() || inner.symlinks.remove(path).is_some();
        if removed {
            Ok(())
        } else {
            Err(not_a(path, "file not found"))
        }
    }

    fn remove_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let mut inner = self.write()?;

        if !inner.directories.contains(path) && !inner.symlinks.contains_key(path) {
            return Err(not_a(path, "directory not found"));
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.symlinks.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> ForgeResult<()> {
        let content = self.read_to_string(from)?;
        self.write_file(to, &content)
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> ForgeResult<()> {
        let mut inner = self.write()?;

        if !inner.directories.contains(from) {
            return Err(not_a(from, "directory not found"));
        }

        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|d| d.strip_prefix(from).ok().map(|rel| to.join(rel)))
            .collect();
        let files: Vec<(PathBuf, String)> = inner
            .files
            .iter()
            .filter_map(|(p, c)| p.strip_prefix(from).ok().map(|rel| (to.join(rel), c.clone())))
            .collect();

        inner.add_dir_all(to);
        for dir in dirs {
            inner.add_dir_all(&dir);
        }
        for (path, content) in files {
            inner.files.insert(path, content);
        }
        Ok(())
    }

    fn symlink(&self, original: &Path, link: &Path) -> ForgeResult<bool> {
        let mut inner = self.write()?;

        if inner.exists(link) {
            return Ok(false);
        }
        if !inner.parent_exists(link) {
            return Err(not_a(link, "Parent directory does not exist"));
        }

        inner
            .symlinks
            .insert(link.to_path_buf(), original.to_path_buf());
        Ok(true)
    }

    fn list_dir(&self, path: &Path) -> ForgeResult<Vec<PathBuf>> {
        let inner = self.read()?;

        if !inner.directories.contains(path) {
            return Err(not_a(path, "directory not found"));
        }

        let is_child = |p: &&PathBuf| p.parent() == Some(path);
        let mut children: BTreeSet<PathBuf> = BTreeSet::new();
        children.extend(inner.files.keys().filter(is_child).cloned());
        children.extend(inner.directories.iter().filter(is_child).cloned());
        children.extend(inner.symlinks.keys().filter(is_child).cloned());

        Ok(children.into_iter().collect())
    }
}

fn not_a(path: &Path, reason: &str) -> wpforge_core::error::ForgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b.txt"), "x").is_err());

        fs.create_dir_all(Path::new("/a")).unwrap();
        fs.write_file(Path::new("/a/b.txt"), "x").unwrap();
        assert_eq!(fs.read_file("/a/b.txt").as_deref(), Some("x"));
    }

    #[test]
    fn remove_dir_all_drops_descendants() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/p/htdocs/README.md", "#");
        fs.seed_file("/p/keep.txt", "k");

        fs.remove_dir_all(Path::new("/p/htdocs")).unwrap();

        assert!(!fs.exists(Path::new("/p/htdocs")));
        assert!(!fs.exists(Path::new("/p/htdocs/README.md")));
        assert!(fs.exists(Path::new("/p/keep.txt")));
    }

    #[test]
    fn copy_dir_all_preserves_layout() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/assets/theme/js/app.js", "app");
        fs.seed_file("/assets/theme/bower.json", "{}");
        fs.create_dir_all(Path::new("/out")).unwrap();

        fs.copy_dir_all(Path::new("/assets/theme"), Path::new("/out/theme"))
            .unwrap();

        assert_eq!(fs.read_file("/out/theme/js/app.js").as_deref(), Some("app"));
        assert!(fs.is_dir(Path::new("/out/theme/js")));
        assert!(fs.is_file(Path::new("/out/theme/bower.json")));
    }

    #[test]
    fn symlink_only_when_absent() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/p/uploads")).unwrap();
        fs.create_dir_all(Path::new("/p/app")).unwrap();

        let link = Path::new("/p/app/uploads");
        assert!(fs.symlink(Path::new("/p/uploads"), link).unwrap());
        assert!(!fs.symlink(Path::new("/elsewhere"), link).unwrap());
        assert_eq!(fs.symlink_target(link), Some(PathBuf::from("/p/uploads")));
        assert!(fs.is_dir(link));
    }

    #[test]
    fn list_dir_returns_immediate_children() {
        let fs = MemoryFilesystem::new();
        fs.seed_file("/stage/b.zip", "");
        fs.seed_file("/stage/a.zip", "");
        fs.seed_file("/stage/nested/c.zip", "");

        let children = fs.list_dir(Path::new("/stage")).unwrap();
        assert_eq!(
            children,
            vec![
                PathBuf::from("/stage/a.zip"),
                PathBuf::from("/stage/b.zip"),
                PathBuf::from("/stage/nested"),
            ]
        );
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let handle = fs.clone();
        fs.seed_file("/x", "1");
        assert!(handle.exists(Path::new("/x")));
    }
}
