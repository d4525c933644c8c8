//! Per-invocation context: where things are and which services to use.
//!
//! [`AppContext`] is built once at startup from the global flags.  It owns the
//! resolved [`ProjectPaths`] and the `--set` overrides, and is the only place
//! that picks concrete adapters for the core ports.
//!
//! # Resource root resolution (first existing directory wins)
//!
//! 1. `$WPFORGE_RESOURCES_DIR`
//! 2. `<cwd>/resources`
//! 3. `<exe-dir>/resources`
//! 4. `<platform data dir>/resources`
//!
//! Falls back to `<cwd>/resources` when none exists.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use wpforge_adapters::{FilesystemTemplateStore, LocalFilesystem, MustacheRenderer, ShellRunner};
use wpforge_core::prelude::*;

use crate::{
    cli::GlobalArgs,
    error::{CliError, CliResult, IntoCli},
    output::{OutputManager, SpinnerRunner},
};

/// Environment variable naming the resource root.
pub const RESOURCES_ENV: &str = "WPFORGE_RESOURCES_DIR";

const RESOURCES_DIR: &str = "resources";

/// Everything a command needs to build services.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub paths: ProjectPaths,
    /// `--config` file, read before the discovered `project.yml`.
    pub config_file: Option<PathBuf>,
    /// `--set` overrides, applied on top of whichever file was read.
    pub overrides: RawConfig,
    pub timeout: Duration,
}

impl AppContext {
    /// Resolve paths and overrides from the global flags.
    pub fn load(args: &GlobalArgs) -> CliResult<Self> {
        let cwd = env::current_dir().with_cli_context(|| "Failed to read the current directory")?;

        let exe_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let data_dir = directories::ProjectDirs::from("org", "wpforge", "wpforge")
            .map(|dirs| dirs.data_dir().to_path_buf());

        let root = resource_root(
            &cwd,
            env::var_os(RESOURCES_ENV).map(PathBuf::from),
            exe_dir,
            data_dir,
            Path::is_dir,
        );

        let paths = ProjectPaths::resolve(&cwd, root, args.dir.clone(), Path::is_file);
        debug!(
            project = %paths.project.display(),
            config = %paths.config.display(),
            resources = %paths.root.display(),
            "Paths resolved"
        );

        let mut overrides = RawConfig::empty();
        for (key, value) in &args.set {
            overrides.set(key, value.clone()).map_err(ForgeError::from)?;
        }

        Ok(Self {
            paths,
            config_file: args.config.clone(),
            overrides,
            timeout: Duration::from_secs(args.timeout),
        })
    }

    /// Add one more override (e.g. a positional `NAME` argument).
    pub fn set_override(&mut self, key: &str, value: impl Into<String>) -> CliResult<()> {
        self.overrides
            .set(key, serde_yaml::Value::String(value.into()))
            .map_err(|e| CliError::Core(e.into()))
    }

    pub fn config_service(&self) -> ConfigService {
        ConfigService::new(Arc::new(LocalFilesystem::new()), self.paths.clone())
    }

    /// Load, merge and derive the project config.
    pub fn resolve_config(&self) -> CliResult<ProjectConfig> {
        let config = self
            .config_service()
            .load_config(self.config_file.as_deref(), &self.overrides)?;
        Ok(config)
    }

    /// Build the orchestrator with the production adapters.
    ///
    /// Fails with [`CliError::ResourcesNotFound`] before touching the project
    /// when the resource root has no `templates/` directory.
    pub fn scaffold_service(
        &self,
        config: ProjectConfig,
        output: &OutputManager,
    ) -> CliResult<ScaffoldService> {
        if !self.paths.templates.is_dir() {
            return Err(CliError::ResourcesNotFound {
                path: self.paths.root.clone(),
            });
        }

        let runner = SpinnerRunner::new(
            Arc::new(ShellRunner::new(self.timeout)),
            output.is_interactive(),
        );
        let ports = ScaffoldPorts {
            filesystem: Arc::new(LocalFilesystem::new()),
            store: Arc::new(FilesystemTemplateStore::new(&self.paths.templates)),
            renderer: Arc::new(MustacheRenderer::new()),
            runner: Arc::new(runner),
        };

        let service = ScaffoldService::init(config, self.paths.clone(), ports)?;
        Ok(service)
    }
}

/// Pick the resource root. `is_dir` is injected so tests need no real tree.
pub fn resource_root(
    cwd: &Path,
    from_env: Option<PathBuf>,
    exe_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    is_dir: impl Fn(&Path) -> bool,
) -> PathBuf {
    let fallback = cwd.join(RESOURCES_DIR);

    let candidates = [
        from_env.map(|dir| absolutize(cwd, dir)),
        Some(fallback.clone()),
        exe_dir.map(|dir| dir.join(RESOURCES_DIR)),
        data_dir.map(|dir| dir.join(RESOURCES_DIR)),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|dir| is_dir(dir))
        .unwrap_or(fallback)
}

fn absolutize(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() { path } else { cwd.join(path) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(existing: &'static [&'static str]) -> impl Fn(&Path) -> bool {
        move |p| existing.iter().any(|e| p == Path::new(e))
    }

    #[test]
    fn env_var_wins_when_it_exists() {
        let root = resource_root(
            Path::new("/work"),
            Some(PathBuf::from("/opt/forge")),
            Some(PathBuf::from("/usr/bin")),
            None,
            only(&["/opt/forge", "/work/resources"]),
        );
        assert_eq!(root, PathBuf::from("/opt/forge"));
    }

    #[test]
    fn relative_env_var_is_taken_from_cwd() {
        let root = resource_root(
            Path::new("/work"),
            Some(PathBuf::from("res")),
            None,
            None,
            only(&["/work/res"]),
        );
        assert_eq!(root, PathBuf::from("/work/res"));
    }

    #[test]
    fn missing_env_dir_falls_through_to_exe_dir() {
        let root = resource_root(
            Path::new("/work"),
            Some(PathBuf::from("/nope")),
            Some(PathBuf::from("/usr/local/bin")),
            Some(PathBuf::from("/home/u/.local/share/wpforge")),
            only(&["/usr/local/bin/resources", "/home/u/.local/share/wpforge/resources"]),
        );
        assert_eq!(root, PathBuf::from("/usr/local/bin/resources"));
    }

    #[test]
    fn data_dir_is_last_resort() {
        let root = resource_root(
            Path::new("/work"),
            None,
            Some(PathBuf::from("/usr/local/bin")),
            Some(PathBuf::from("/data")),
            only(&["/data/resources"]),
        );
        assert_eq!(root, PathBuf::from("/data/resources"));
    }

    #[test]
    fn nothing_exists_falls_back_to_cwd() {
        let root = resource_root(Path::new("/work"), None, None, None, |_| false);
        assert_eq!(root, PathBuf::from("/work/resources"));
    }

    #[test]
    fn overrides_are_collected_from_flags() {
        let args = GlobalArgs {
            set: vec![
                ("project.title".into(), serde_yaml::Value::String("Acme".into())),
                ("vvv".into(), serde_yaml::Value::Bool(true)),
            ],
            ..GlobalArgs::default()
        };
        let mut ctx = AppContext::load(&args).unwrap();
        ctx.set_override("plugin.name", "Acme Blocks").unwrap();

        let value = ctx.overrides.as_value();
        assert_eq!(value["project"]["title"], "Acme");
        assert_eq!(value["vvv"], true);
        assert_eq!(value["plugin"]["name"], "Acme Blocks");
        assert_eq!(ctx.timeout, Duration::from_secs(600));
    }
}
