//! Config Service - loads, resolves, and writes `project.yml`.
//!
//! Resolution pipeline:
//! 1. Read the explicit file, or the conventional one found by upward search
//! 2. Overlay command-line overrides
//! 3. Whitelist-merge over the defaults
//! 4. Run the derivation passes
//!
//! The result is a plain [`ProjectConfig`] value; callers hold on to it and
//! pass it to whatever needs it.

use std::path::Path;
use std::sync::Arc;

use serde_yaml::Value;
use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{ProjectConfig, ProjectPaths, RawConfig, derive, whitelist_merge},
    error::{ForgeError, ForgeResult},
};

/// Service for project configuration.
pub struct ConfigService {
    filesystem: Arc<dyn Filesystem>,
    paths: ProjectPaths,
}

impl ConfigService {
    pub fn new(filesystem: Arc<dyn Filesystem>, paths: ProjectPaths) -> Self {
        Self { filesystem, paths }
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// The static default configuration.
    pub fn default_config() -> ProjectConfig {
        ProjectConfig::default()
    }

    /// Load and resolve the project configuration.
    ///
    /// `file` is tried first; when it is absent, missing, or empty the
    /// conventional `project.yml` is read instead. A missing or blank file
    /// counts as an empty config. `overrides` win over file values.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::ConfigParse`] if a file exists but is not a YAML
    /// mapping; derivation errors from [`Self::parse_config`].
    #[instrument(skip_all, fields(file = ?file))]
    pub fn load_config(
        &self,
        file: Option<&Path>,
        overrides: &RawConfig,
    ) -> ForgeResult<ProjectConfig> {
        let mut raw = match file {
            Some(path) => self.read_raw(path)?,
            None => RawConfig::empty(),
        };

        if raw.is_empty() {
            raw = self.read_raw(&self.paths.config)?;
        }

        raw.overlay(overrides);
        let config = self.parse_config(&raw)?;

        info!(
            title = %config.project.title,
            slug = %config.project.slug,
            env = %config.env,
            "Config resolved"
        );
        Ok(config)
    }

    /// Merge `raw` over the defaults and run every derivation pass.
    ///
    /// Apart from secret generation this is deterministic, and it is
    /// idempotent: resolving an already resolved config changes nothing.
    pub fn parse_config(&self, raw: &RawConfig) -> ForgeResult<ProjectConfig> {
        let defaults = serde_yaml::to_value(ProjectConfig::default()).map_err(serialize_error)?;
        let merged = whitelist_merge(&defaults, raw);

        let mut config: ProjectConfig =
            serde_yaml::from_value(merged).map_err(|e| ForgeError::Internal {
                message: format!("merged config does not match the default shape: {e}"),
            })?;

        derive::run_all(&mut config)?;

        if config.project.folder.is_empty() {
            config.project.folder = self
                .paths
                .project
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        Ok(config)
    }

    /// Write the default config to the conventional path.
    ///
    /// With `force`, an existing file is deleted first. Returns `true` if a
    /// file was written, `false` if one already existed.
    #[instrument(skip(self), fields(path = %self.paths.config.display()))]
    pub fn create_config_file(&self, force: bool) -> ForgeResult<bool> {
        let path = &self.paths.config;

        if force && self.filesystem.exists(path) {
            debug!("Removing existing config");
            self.filesystem.remove_file(path)?;
        }

        if self.filesystem.exists(path) {
            debug!("Config already exists, leaving it untouched");
            return Ok(false);
        }

        self.write_yaml(&ProjectConfig::default())?;
        info!("Config file created");
        Ok(true)
    }

    /// Persist a resolved config (including generated secrets).
    #[instrument(skip_all, fields(path = %self.paths.config.display()))]
    pub fn save_config(&self, config: &ProjectConfig) -> ForgeResult<()> {
        self.write_yaml(config)?;
        info!("Config saved");
        Ok(())
    }

    /// YAML text of a config, in the on-disk format.
    pub fn to_yaml(config: &ProjectConfig) -> ForgeResult<String> {
        serde_yaml::to_string(config).map_err(serialize_error)
    }

    fn write_yaml(&self, config: &ProjectConfig) -> ForgeResult<()> {
        let path = &self.paths.config;
        let yaml = Self::to_yaml(config)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, &yaml)
    }

    fn read_raw(&self, path: &Path) -> ForgeResult<RawConfig> {
        if !self.filesystem.is_file(path) {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(RawConfig::empty());
        }

        let text = self.filesystem.read_to_string(path)?;
        parse_yaml(path, &text)
    }
}

/// Parse config text. Blank text is an empty config; anything that is not a
/// YAML mapping is an error.
pub fn parse_yaml(path: &Path, text: &str) -> ForgeResult<RawConfig> {
    if text.trim().is_empty() {
        return Ok(RawConfig::empty());
    }

    let value: Value = serde_yaml::from_str(text).map_err(|e| ApplicationError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    RawConfig::from_value(value).map_err(|e| {
        ApplicationError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn serialize_error(e: serde_yaml::Error) -> ForgeError {
    ApplicationError::ConfigSerialize {
        reason: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::secrets::SECRET_LEN;

    fn paths() -> ProjectPaths {
        ProjectPaths::resolve("/work/acme", "/opt/wpforge", None, |_| false)
    }

    /// A service whose filesystem panics on any call.
    fn pure_service() -> ConfigService {
        ConfigService::new(Arc::new(MockFilesystem::new()), paths())
    }

    fn raw(yaml: &str) -> RawConfig {
        parse_yaml(Path::new("test.yml"), yaml).unwrap()
    }

    fn top_level_keys(config: &ProjectConfig) -> Vec<String> {
        let value = serde_yaml::to_value(config).unwrap();
        let mut keys: Vec<String> = value
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        keys.sort();
        keys
    }

    // ── parse_config ──────────────────────────────────────────────────────

    #[test]
    fn output_has_exactly_the_default_keys() {
        let svc = pure_service();
        let resolved = svc
            .parse_config(&raw("bogus: 1\nproject: {title: X, nope: 2}\n"))
            .unwrap();
        assert_eq!(
            top_level_keys(&resolved),
            top_level_keys(&ProjectConfig::default())
        );
    }

    #[test]
    fn acme_site_end_to_end() {
        let svc = pure_service();
        let cfg = svc
            .parse_config(&raw("project:\n  title: Acme Site\n"))
            .unwrap();

        assert_eq!(cfg.project.slug, "acme-site");
        assert_eq!(cfg.project.url, "acme-site.dev");
        assert_eq!(cfg.project.namespace, "ACME_SITE");
        assert_eq!(cfg.project.folder, "acme");
        assert_eq!(cfg.plugin.name, "Acme Site");
        assert_eq!(cfg.plugin.namespace, "ACME_SITE\\Plugin");
        assert_eq!(cfg.theme.namespace, "ACME_SITE\\Theme");
        assert_eq!(cfg.db.name, "acme-site");
    }

    #[test]
    fn slug_only_expands_to_title() {
        let cfg = pure_service()
            .parse_config(&raw("project: {slug: my-cool-site}"))
            .unwrap();
        assert_eq!(cfg.project.title, "My Cool Site");
    }

    #[test]
    fn parse_is_idempotent() {
        let svc = pure_service();
        let once = svc.parse_config(&raw("project: {title: Foo Bar}")).unwrap();

        let reparsed_input = RawConfig::from_value(serde_yaml::to_value(&once).unwrap()).unwrap();
        let twice = svc.parse_config(&reparsed_input).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn independent_resolutions_differ_in_secrets() {
        let svc = pure_service();
        let a = svc.parse_config(&RawConfig::empty()).unwrap();
        let b = svc.parse_config(&RawConfig::empty()).unwrap();

        for ((name, x), (_, y)) in a.secret.fields().into_iter().zip(b.secret.fields()) {
            assert_eq!(x.len(), SECRET_LEN, "{name}");
            assert_eq!(y.len(), SECRET_LEN, "{name}");
            assert_ne!(x, y, "{name} should be random");
        }
    }

    #[test]
    fn supplied_secrets_are_kept() {
        let cfg = pure_service()
            .parse_config(&raw("secret: {auth_key: fixed}\ndb: {prefix: wp_}"))
            .unwrap();
        assert_eq!(cfg.secret.auth_key, "fixed");
        assert_eq!(cfg.db.prefix, "wp_");
    }

    // ── parse_yaml ────────────────────────────────────────────────────────

    #[test]
    fn blank_yaml_is_empty_config() {
        assert!(raw("   \n").is_empty());
        assert!(raw("# only a comment\n").is_empty());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = parse_yaml(Path::new("project.yml"), "project: [unclosed").unwrap_err();
        assert!(matches!(
            err,
            ForgeError::Application(ApplicationError::ConfigParse { .. })
        ));
    }

    #[test]
    fn non_mapping_yaml_is_an_error() {
        assert!(parse_yaml(Path::new("project.yml"), "- a\n- b\n").is_err());
    }

    // ── load_config ───────────────────────────────────────────────────────

    #[test]
    fn load_without_any_file_uses_defaults_and_overrides() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_file().returning(|_| false);
        let svc = ConfigService::new(Arc::new(fs), paths());

        let mut overrides = RawConfig::empty();
        overrides
            .set("project.title", Value::String("Acme Site".into()))
            .unwrap();

        let cfg = svc.load_config(None, &overrides).unwrap();
        assert_eq!(cfg.project.slug, "acme-site");
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_file()
            .returning(|p| p == Path::new("/work/acme/project.yml"));
        fs.expect_read_to_string()
            .returning(|_| Ok("project:\n  title: From File\nvvv: false\n".into()));
        let svc = ConfigService::new(Arc::new(fs), paths());

        let mut overrides = RawConfig::empty();
        overrides.set("vvv", Value::Bool(true)).unwrap();

        let cfg = svc.load_config(None, &overrides).unwrap();
        assert_eq!(cfg.project.title, "From File");
        assert!(cfg.vvv);
    }

    #[test]
    fn empty_explicit_file_falls_back_to_conventional() {
        let explicit = PathBuf::from("/tmp/custom.yml");
        let mut fs = MockFilesystem::new();
        fs.expect_is_file().returning(|_| true);
        fs.expect_read_to_string().returning(|p| {
            if p == Path::new("/tmp/custom.yml") {
                Ok(String::new())
            } else {
                Ok("project: {title: Conventional}".into())
            }
        });
        let svc = ConfigService::new(Arc::new(fs), paths());

        let cfg = svc
            .load_config(Some(&explicit), &RawConfig::empty())
            .unwrap();
        assert_eq!(cfg.project.title, "Conventional");
    }

    #[test]
    fn explicit_file_wins_when_non_empty() {
        let explicit = PathBuf::from("/tmp/custom.yml");
        let mut fs = MockFilesystem::new();
        fs.expect_is_file().returning(|_| true);
        fs.expect_read_to_string()
            .times(1)
            .returning(|_| Ok("project: {title: Explicit}".into()));
        let svc = ConfigService::new(Arc::new(fs), paths());

        let cfg = svc
            .load_config(Some(&explicit), &RawConfig::empty())
            .unwrap();
        assert_eq!(cfg.project.title, "Explicit");
    }

    #[test]
    fn malformed_file_surfaces_parse_error() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_file().returning(|_| true);
        fs.expect_read_to_string()
            .returning(|_| Ok("project: {title: [".into()));
        let svc = ConfigService::new(Arc::new(fs), paths());

        assert!(svc.load_config(None, &RawConfig::empty()).is_err());
    }

    // ── create_config_file ────────────────────────────────────────────────

    #[test]
    fn create_skips_existing_file_without_force() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_write_file().never();
        fs.expect_remove_file().never();
        let svc = ConfigService::new(Arc::new(fs), paths());

        assert!(!svc.create_config_file(false).unwrap());
    }

    #[test]
    fn create_writes_default_yaml() {
        let expected = ConfigService::to_yaml(&ProjectConfig::default()).unwrap();
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(move |path, content| {
                path == Path::new("/work/acme/project.yml") && content == expected
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let svc = ConfigService::new(Arc::new(fs), paths());

        assert!(svc.create_config_file(false).unwrap());
    }
}
