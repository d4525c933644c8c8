//! Ordered derivation passes over a merged [`ProjectConfig`].
//!
//! Every pass only fills fields that are still empty, so running the whole
//! pipeline twice yields the same result as running it once. Order matters:
//! later passes read fields that earlier passes may have filled (the plugin
//! pass falls back to `project.title`, the database pass reads
//! `project.slug`, the identifier pass reads the final names).

use tracing::trace;

use crate::domain::{
    ArtifactKind, DomainError, ProjectConfig, inflect,
    secrets::{self, DB_PREFIX_LEN, Encoding, SECRET_LEN},
};

/// A single derivation step.
pub type Pass = fn(&mut ProjectConfig) -> Result<(), DomainError>;

/// The derivation pipeline, in execution order.
pub const PASSES: &[(&str, Pass)] = &[
    ("project", derive_project),
    ("plugin", derive_plugin),
    ("theme", derive_theme),
    ("database", derive_database),
    ("secrets", derive_secrets),
    ("identifiers", derive_identifiers),
];

/// Run every pass in [`PASSES`] order.
pub fn run_all(config: &mut ProjectConfig) -> Result<(), DomainError> {
    for (name, pass) in PASSES {
        trace!(pass = name, "running derivation pass");
        pass(config)?;
    }
    Ok(())
}

/// Title ⇄ slug, then `url` from the slug.
pub fn derive_project(config: &mut ProjectConfig) -> Result<(), DomainError> {
    let project = &mut config.project;

    if project.title.is_empty() && !project.slug.is_empty() {
        project.title = inflect::title_case(&project.slug);
    }
    if project.slug.is_empty() && !project.title.is_empty() {
        project.slug = inflect::kebab_case(&project.title);
    }
    // No slug, no url: a bare ".dev" would be kept once a slug shows up.
    if project.url.is_empty() && !project.slug.is_empty() {
        project.url = format!("{}.dev", project.slug);
    }
    Ok(())
}

pub fn derive_plugin(config: &mut ProjectConfig) -> Result<(), DomainError> {
    derive_artifact(config, ArtifactKind::Plugin);
    Ok(())
}

pub fn derive_theme(config: &mut ProjectConfig) -> Result<(), DomainError> {
    derive_artifact(config, ArtifactKind::Theme);
    Ok(())
}

/// Name from slug (or the project title), then slug from name.
fn derive_artifact(config: &mut ProjectConfig, kind: ArtifactKind) {
    let fallback_name = config.project.title.clone();
    let artifact = config.artifact_mut(kind);

    if artifact.name.is_empty() {
        artifact.name = if artifact.slug.is_empty() {
            fallback_name
        } else {
            inflect::title_case(&artifact.slug)
        };
    }
    if artifact.slug.is_empty() && !artifact.name.is_empty() {
        artifact.slug = inflect::kebab_case(&artifact.name);
    }
}

/// Database name from the project slug; random table prefix.
pub fn derive_database(config: &mut ProjectConfig) -> Result<(), DomainError> {
    if config.db.name.is_empty() {
        config.db.name = config.project.slug.clone();
    }
    if config.db.prefix.is_empty() {
        let random = secrets::random_string(DB_PREFIX_LEN, Encoding::Hex)?;
        config.db.prefix = format!("{random}_");
    }
    Ok(())
}

/// Fill every empty WordPress key and salt.
pub fn derive_secrets(config: &mut ProjectConfig) -> Result<(), DomainError> {
    for (name, value) in config.secret.fields_mut() {
        if value.is_empty() {
            *value = secrets::random_string(SECRET_LEN, Encoding::Base64)?;
            trace!(secret = name, "generated secret");
        }
    }
    Ok(())
}

/// PHP identifiers computed from the final names.
pub fn derive_identifiers(config: &mut ProjectConfig) -> Result<(), DomainError> {
    if config.project.namespace.is_empty() {
        config.project.namespace = inflect::upper_snake_case(&config.project.title);
    }

    let project_namespace = config.project.namespace.clone();
    for kind in [ArtifactKind::Plugin, ArtifactKind::Theme] {
        let artifact = config.artifact_mut(kind);
        if artifact.id.is_empty() {
            artifact.id = inflect::snake_case(&artifact.name);
        }
        if artifact.class.is_empty() {
            artifact.class = inflect::upper_snake_case(&artifact.name);
        }
        if artifact.namespace.is_empty() {
            let root = if project_namespace.is_empty() {
                &artifact.class
            } else {
                &project_namespace
            };
            if !root.is_empty() {
                artifact.namespace = format!("{root}\\{}", kind.namespace_suffix());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> ProjectConfig {
        let mut cfg = ProjectConfig::default();
        cfg.project.title = title.into();
        cfg
    }

    #[test]
    fn pipeline_order_is_fixed() {
        let names: Vec<_> = PASSES.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            ["project", "plugin", "theme", "database", "secrets", "identifiers"]
        );
    }

    #[test]
    fn project_title_from_slug() {
        let mut cfg = ProjectConfig::default();
        cfg.project.slug = "my-cool-site".into();
        derive_project(&mut cfg).unwrap();
        assert_eq!(cfg.project.title, "My Cool Site");
        assert_eq!(cfg.project.url, "my-cool-site.dev");
    }

    #[test]
    fn project_slug_from_title() {
        let mut cfg = titled("Acme Site");
        derive_project(&mut cfg).unwrap();
        assert_eq!(cfg.project.slug, "acme-site");
        assert_eq!(cfg.project.url, "acme-site.dev");
    }

    #[test]
    fn project_keeps_explicit_url() {
        let mut cfg = titled("Acme Site");
        cfg.project.url = "acme.test".into();
        derive_project(&mut cfg).unwrap();
        assert_eq!(cfg.project.url, "acme.test");
    }

    #[test]
    fn url_stays_empty_without_a_slug() {
        let mut cfg = ProjectConfig::default();
        derive_project(&mut cfg).unwrap();
        assert_eq!(cfg.project.url, "");

        // A later slug still yields the slug-based url.
        cfg.project.slug = "acme".into();
        derive_project(&mut cfg).unwrap();
        assert_eq!(cfg.project.url, "acme.dev");
    }

    #[test]
    fn empty_project_derives_nothing() {
        let mut cfg = ProjectConfig::default();
        derive_project(&mut cfg).unwrap();
        assert_eq!(cfg.project, ProjectConfig::default().project);
    }

    #[test]
    fn plugin_falls_back_to_project_title() {
        let mut cfg = titled("Foo Bar");
        derive_plugin(&mut cfg).unwrap();
        assert_eq!(cfg.plugin.name, "Foo Bar");
        assert_eq!(cfg.plugin.slug, "foo-bar");
    }

    #[test]
    fn plugin_name_from_slug() {
        let mut cfg = titled("Foo Bar");
        cfg.plugin.slug = "acme-widgets".into();
        derive_plugin(&mut cfg).unwrap();
        assert_eq!(cfg.plugin.name, "Acme Widgets");
        assert_eq!(cfg.plugin.slug, "acme-widgets");
    }

    #[test]
    fn theme_mirrors_plugin_logic() {
        let mut cfg = titled("Foo Bar");
        cfg.theme.name = "Dark Mode".into();
        derive_theme(&mut cfg).unwrap();
        assert_eq!(cfg.theme.slug, "dark-mode");
        assert!(cfg.plugin.name.is_empty(), "theme pass must not touch plugin");
    }

    #[test]
    fn database_name_and_prefix() {
        let mut cfg = titled("Acme Site");
        derive_project(&mut cfg).unwrap();
        derive_database(&mut cfg).unwrap();
        assert_eq!(cfg.db.name, "acme-site");

        let re = regex_lite::Regex::new(r"^[0-9a-f]{8}_$").unwrap();
        assert!(re.is_match(&cfg.db.prefix), "prefix {}", cfg.db.prefix);
    }

    #[test]
    fn database_keeps_explicit_prefix() {
        let mut cfg = ProjectConfig::default();
        cfg.db.prefix = "wp_".into();
        derive_database(&mut cfg).unwrap();
        assert_eq!(cfg.db.prefix, "wp_");
    }

    #[test]
    fn secrets_fill_only_empty_fields() {
        let mut cfg = ProjectConfig::default();
        cfg.secret.nonce_salt = "keep-me".into();
        derive_secrets(&mut cfg).unwrap();

        for (name, value) in cfg.secret.fields() {
            if name == "nonce_salt" {
                assert_eq!(value, "keep-me");
            } else {
                assert_eq!(value.len(), SECRET_LEN, "{name}");
            }
        }
    }

    #[test]
    fn identifiers_use_project_namespace() {
        let mut cfg = titled("Acme Site");
        cfg.plugin.name = "Acme Site".into();
        derive_identifiers(&mut cfg).unwrap();

        assert_eq!(cfg.project.namespace, "ACME_SITE");
        assert_eq!(cfg.plugin.id, "acme_site");
        assert_eq!(cfg.plugin.class, "ACME_SITE");
        assert_eq!(cfg.plugin.namespace, "ACME_SITE\\Plugin");
    }

    #[test]
    fn identifiers_fall_back_to_class_without_project_namespace() {
        let mut cfg = ProjectConfig::default();
        cfg.theme.name = "Dark Mode".into();
        derive_identifiers(&mut cfg).unwrap();

        assert!(cfg.project.namespace.is_empty());
        assert_eq!(cfg.theme.namespace, "DARK_MODE\\Theme");
        assert!(cfg.plugin.namespace.is_empty());
    }

    #[test]
    fn run_all_is_idempotent() {
        let mut once = titled("Acme Site");
        run_all(&mut once).unwrap();
        let mut twice = once.clone();
        run_all(&mut twice).unwrap();
        assert_eq!(once, twice);
    }
}
