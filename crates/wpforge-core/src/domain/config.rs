//! The project configuration model.
//!
//! [`ProjectConfig::default()`] is the complete default shape: every field the
//! tool ever reads exists here with a defined value. User input is merged into
//! this shape (see [`crate::domain::merge`]) and anything outside it is
//! discarded, so downstream code can read any field without `Option` checks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the per-project config file, found by upward search.
pub const CONFIG_FILE_NAME: &str = "project.yml";

/// Environment name that makes `init` wipe the project directory first.
pub const TEST_ENV: &str = "test";

/// Resolved (or default) project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub author: AuthorConfig,
    pub project: ProjectInfo,
    pub repo: RepoConfig,
    pub plugin: ArtifactConfig,
    pub theme: ArtifactConfig,
    pub admin: AdminConfig,
    pub db: DbConfig,
    pub secret: SecretConfig,
    /// Render the VVV (Varying Vagrant Vagrants) template group.
    pub vvv: bool,
    pub debug: bool,
    /// API token handed to templates (e.g. for private package registries).
    pub token: String,
    /// Runtime environment; `test` wipes the project directory on init.
    pub env: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            author: AuthorConfig::default(),
            project: ProjectInfo::default(),
            repo: RepoConfig::default(),
            plugin: ArtifactConfig::default(),
            theme: ArtifactConfig::default(),
            admin: AdminConfig::default(),
            db: DbConfig::default(),
            secret: SecretConfig::default(),
            vvv: false,
            debug: false,
            token: String::new(),
            env: "development".into(),
        }
    }
}

impl ProjectConfig {
    /// Borrow the plugin or theme section.
    pub fn artifact(&self, kind: ArtifactKind) -> &ArtifactConfig {
        match kind {
            ArtifactKind::Plugin => &self.plugin,
            ArtifactKind::Theme => &self.theme,
        }
    }

    /// Mutably borrow the plugin or theme section.
    pub fn artifact_mut(&mut self, kind: ArtifactKind) -> &mut ArtifactConfig {
        match kind {
            ArtifactKind::Plugin => &mut self.plugin,
            ArtifactKind::Theme => &mut self.theme,
        }
    }

    pub fn is_test_env(&self) -> bool {
        self.env == TEST_ENV
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub email: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub url: String,
    /// Basename of the project directory.
    pub folder: String,
    /// PHP namespace root, e.g. `ACME_SITE`.
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Run `git init` in the project directory.
    pub create: bool,
    /// Added as the `origin` remote when non-empty.
    pub url: String,
}

/// Shared shape of the `plugin` and `theme` sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub scaffold: bool,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub id: String,
    pub class: String,
    pub namespace: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            scaffold: true,
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            id: String::new(),
            class: String::new(),
            namespace: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub user: String,
    pub pass: String,
    pub email: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            user: "admin".into(),
            pass: "admin".into(),
            email: "admin@localhost.dev".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub name: String,
    pub user: String,
    pub pass: String,
    pub host: String,
    /// Table prefix, e.g. `3f9a0c1e_`.
    pub prefix: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            user: "wp".into(),
            pass: "wp".into(),
            host: "localhost".into(),
            prefix: String::new(),
        }
    }
}

/// WordPress authentication keys and salts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretConfig {
    pub auth_key: String,
    pub auth_salt: String,
    pub secure_auth_key: String,
    pub secure_auth_salt: String,
    pub logged_in_key: String,
    pub logged_in_salt: String,
    pub nonce_key: String,
    pub nonce_salt: String,
}

impl SecretConfig {
    /// All eight secret fields, keyed by their YAML name.
    pub fn fields(&self) -> [(&'static str, &String); 8] {
        [
            ("auth_key", &self.auth_key),
            ("auth_salt", &self.auth_salt),
            ("secure_auth_key", &self.secure_auth_key),
            ("secure_auth_salt", &self.secure_auth_salt),
            ("logged_in_key", &self.logged_in_key),
            ("logged_in_salt", &self.logged_in_salt),
            ("nonce_key", &self.nonce_key),
            ("nonce_salt", &self.nonce_salt),
        ]
    }

    pub fn fields_mut(&mut self) -> [(&'static str, &mut String); 8] {
        [
            ("auth_key", &mut self.auth_key),
            ("auth_salt", &mut self.auth_salt),
            ("secure_auth_key", &mut self.secure_auth_key),
            ("secure_auth_salt", &mut self.secure_auth_salt),
            ("logged_in_key", &mut self.logged_in_key),
            ("logged_in_salt", &mut self.logged_in_salt),
            ("nonce_key", &mut self.nonce_key),
            ("nonce_salt", &mut self.nonce_salt),
        ]
    }
}

/// The two kinds of WordPress artifact the tool scaffolds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Plugin,
    Theme,
}

impl ArtifactKind {
    /// Config section name and template group name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plugin => "plugin",
            Self::Theme => "theme",
        }
    }

    /// Last segment of the artifact's PHP namespace.
    pub const fn namespace_suffix(self) -> &'static str {
        match self {
            Self::Plugin => "Plugin",
            Self::Theme => "Theme",
        }
    }

    /// Template group rendered by `create-tests`.
    pub const fn tests_group(self) -> &'static str {
        match self {
            Self::Plugin => "plugin-tests",
            Self::Theme => "theme-tests",
        }
    }

    pub const fn name_field(self) -> &'static str {
        match self {
            Self::Plugin => "plugin.name",
            Self::Theme => "theme.name",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_scalars() {
        let cfg = ProjectConfig::default();
        assert!(!cfg.vvv);
        assert!(!cfg.debug);
        assert_eq!(cfg.env, "development");
        assert!(cfg.plugin.scaffold);
        assert!(cfg.theme.scaffold);
        assert_eq!(cfg.db.host, "localhost");
    }

    #[test]
    fn default_serialises_every_section() {
        let value = serde_yaml::to_value(ProjectConfig::default()).unwrap();
        let map = value.as_mapping().unwrap();
        for key in [
            "author", "project", "repo", "plugin", "theme", "admin", "db", "secret", "vvv",
            "debug", "token", "env",
        ] {
            assert!(map.contains_key(key), "missing {key}");
        }
        assert_eq!(map.len(), 12);
    }

    #[test]
    fn secret_fields_cover_all_eight() {
        let mut secrets = SecretConfig::default();
        for (_, value) in secrets.fields_mut() {
            value.push('x');
        }
        assert!(secrets.fields().iter().all(|(_, v)| v.as_str() == "x"));
    }

    #[test]
    fn test_env_detection() {
        let cfg = ProjectConfig {
            env: "test".into(),
            ..ProjectConfig::default()
        };
        assert!(cfg.is_test_env());
        assert!(!ProjectConfig::default().is_test_env());
    }
}
