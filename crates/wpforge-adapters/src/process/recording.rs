//! Process runner that records instead of executing (testing).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use wpforge_core::{
    application::{
        ApplicationError,
        ports::{ExternalCommand, ProcessRunner},
    },
    error::ForgeResult,
};

/// Records every command and its working directory.
///
/// Commands whose display form is registered with [`Self::failing`] return
/// [`ApplicationError::CommandFailed`]; everything else succeeds.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` (e.g. `"bower install"`) fail from now on.
    pub fn failing(self, command: &str) -> Self {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(command.to_string());
        }
        self
    }

    /// `(command, cwd)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Command strings in call order.
    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|(cmd, _)| cmd).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, command: &ExternalCommand, cwd: &Path) -> ForgeResult<()> {
        let display = command.to_string();

        self.calls
            .lock()
            .map_err(|_| ApplicationError::LockPoisoned)?
            .push((display.clone(), cwd.to_path_buf()));

        let fails = self
            .failing
            .lock()
            .map_err(|_| ApplicationError::LockPoisoned)?
            .contains(&display);

        if fails {
            return Err(ApplicationError::CommandFailed {
                command: display,
                status: "exit status: 1".into(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_and_fails_on_demand() {
        let runner = RecordingRunner::new().failing("npm run build");

        runner
            .run(&ExternalCommand::new("npm", ["install"]), Path::new("/t"))
            .unwrap();
        assert!(
            runner
                .run(&ExternalCommand::new("npm", ["run", "build"]), Path::new("/t"))
                .is_err()
        );

        assert_eq!(runner.commands(), ["npm install", "npm run build"]);
        assert_eq!(runner.calls()[0].1, PathBuf::from("/t"));
    }
}
