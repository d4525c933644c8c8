//! In-memory template store for testing.

use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{Arc, RwLock},
};

use wpforge_core::{
    application::{
        ApplicationError,
        ports::{TemplateFile, TemplateStore},
    },
    error::ForgeResult,
};

/// Thread-safe in-memory template store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateStore {
    inner: Arc<RwLock<BTreeMap<String, Vec<TemplateFile>>>>,
}

impl InMemoryTemplateStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an (initially empty) group.
    pub fn with_group(self, group: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.entry(group.to_string()).or_default();
        }
        self
    }

    /// Add one file to a group, creating the group if needed.
    pub fn with_file(self, group: &str, path: &str, content: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner
                .entry(group.to_string())
                .or_default()
                .push(TemplateFile::new(path, content));
        }
        self
    }

    /// Number of registered groups.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn load_group(&self, group: &str) -> ForgeResult<Vec<TemplateFile>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        inner.get(group).cloned().ok_or_else(|| {
            ApplicationError::TemplateGroupNotFound {
                group: group.to_string(),
                path: PathBuf::from(group),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_keep_insertion_order_of_files() {
        let store = InMemoryTemplateStore::new()
            .with_file("scripts", "b.sh", "b")
            .with_file("scripts", "a.sh", "a")
            .with_group("vvv");

        let files = store.load_group("scripts").unwrap();
        assert_eq!(files[0].path, PathBuf::from("b.sh"));
        assert_eq!(files[1].content, "a");
        assert!(store.load_group("vvv").unwrap().is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn unknown_group_errors() {
        let store = InMemoryTemplateStore::new();
        assert!(store.load_group("theme").is_err());
    }
}
