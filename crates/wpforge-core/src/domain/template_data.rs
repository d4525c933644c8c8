//! Data handed to the template renderer.
//!
//! The resolved config is serialised as-is, so templates address fields by
//! their config path (`{{project.title}}`, `{{plugin.namespace}}`). Two extra
//! top-level keys are added:
//!
//! | Key       | Content                                    |
//! |-----------|--------------------------------------------|
//! | `plugins` | `[{name, file}]` for staged plugin archives |
//! | `meta`    | `{year, date, version}` of the generation  |

use chrono::{Datelike, Local};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{DomainError, ProjectConfig};

/// A staged plugin archive copied into the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginArchive {
    /// Display name, e.g. `Advanced Custom Fields Pro`.
    pub name: String,
    /// Archive file name, e.g. `advanced-custom-fields-pro.zip`.
    pub file: String,
}

/// Render data: resolved config plus run metadata.
#[derive(Debug, Clone)]
pub struct TemplateData {
    value: Value,
}

impl TemplateData {
    /// Build template data from a resolved config.
    pub fn new(config: &ProjectConfig) -> Result<Self, DomainError> {
        let mut value = serde_json::to_value(config).map_err(|e| DomainError::InvalidValue {
            field: "<config>".into(),
            reason: e.to_string(),
        })?;

        let now = Local::now();
        let mut meta = Map::new();
        meta.insert("year".into(), Value::String(now.year().to_string()));
        meta.insert("date".into(), Value::String(now.format("%Y-%m-%d").to_string()));
        meta.insert("version".into(), Value::String(crate::VERSION.to_string()));

        if let Value::Object(map) = &mut value {
            map.insert("plugins".into(), Value::Array(Vec::new()));
            map.insert("meta".into(), Value::Object(meta));
        }

        Ok(Self { value })
    }

    /// Append a staged plugin archive to the `plugins` list. An archive whose
    /// file is already listed is ignored.
    pub fn push_plugin(&mut self, archive: PluginArchive) {
        if let Some(Value::Array(list)) = self.value.get_mut("plugins") {
            if list.iter().any(|p| p["file"] == archive.file.as_str()) {
                return;
            }
            list.push(serde_json::json!({ "name": archive.name, "file": archive.file }));
        }
    }

    /// Staged archives recorded so far.
    pub fn plugins(&self) -> &[Value] {
        self.value
            .get("plugins")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_config_fields_by_path() {
        let mut cfg = ProjectConfig::default();
        cfg.project.title = "Acme Site".into();
        let data = TemplateData::new(&cfg).unwrap();

        assert_eq!(data.as_value()["project"]["title"], "Acme Site");
        assert_eq!(data.as_value()["vvv"], false);
        assert!(data.as_value()["meta"]["year"].is_string());
    }

    #[test]
    fn plugins_start_empty_and_accumulate() {
        let mut data = TemplateData::new(&ProjectConfig::default()).unwrap();
        assert!(data.plugins().is_empty());

        data.push_plugin(PluginArchive {
            name: "Gravity Forms".into(),
            file: "gravity-forms.zip".into(),
        });

        assert_eq!(data.plugins().len(), 1);
        assert_eq!(data.as_value()["plugins"][0]["file"], "gravity-forms.zip");
    }

    #[test]
    fn duplicate_archives_are_listed_once() {
        let mut data = TemplateData::new(&ProjectConfig::default()).unwrap();
        for _ in 0..2 {
            data.push_plugin(PluginArchive {
                name: "Acf Pro".into(),
                file: "acf-pro.zip".into(),
            });
        }
        assert_eq!(data.plugins().len(), 1);
    }
}
