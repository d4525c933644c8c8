//! Raw (untyped) configuration and its merge rules.
//!
//! Two merges exist:
//!
//! - [`RawConfig::overlay`]: raw-over-raw, used to layer CLI `--set`
//!   overrides on top of the file contents. Keeps every key.
//! - [`whitelist_merge`]: raw-over-defaults. The result has exactly the
//!   shape of the defaults; unknown keys are dropped and values of the wrong
//!   shape are ignored in favour of the default.

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::domain::DomainError;

/// An unvalidated configuration fragment (YAML file and/or CLI overrides).
#[derive(Debug, Clone, PartialEq)]
pub struct RawConfig(Value);

impl Default for RawConfig {
    fn default() -> Self {
        Self::empty()
    }
}

impl RawConfig {
    /// An empty mapping.
    pub fn empty() -> Self {
        Self(Value::Mapping(Mapping::new()))
    }

    /// Wrap a parsed YAML document. `null` (blank document) becomes empty.
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidValue`] if the document is not a mapping.
    pub fn from_value(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Null => Ok(Self::empty()),
            Value::Mapping(_) => Ok(Self(value)),
            other => Err(DomainError::InvalidValue {
                field: "<root>".into(),
                reason: format!("expected a mapping, found {}", kind_of(&other)),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_mapping().is_none_or(Mapping::is_empty)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Deep-merge `other` over `self`; `other` wins on conflicts.
    pub fn overlay(&mut self, other: &RawConfig) {
        overlay_value(&mut self.0, &other.0);
    }

    /// Set a dotted key path (e.g. `project.title`), creating mappings as needed.
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidValue`] if the key is empty or has empty segments.
    pub fn set(&mut self, dotted_key: &str, value: Value) -> Result<(), DomainError> {
        let segments: Vec<&str> = dotted_key.split('.').collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(DomainError::InvalidValue {
                field: dotted_key.into(),
                reason: "key path must not contain empty segments".into(),
            });
        }

        let (leaf, parents) = segments
            .split_last()
            .ok_or_else(|| DomainError::InvalidValue {
                field: dotted_key.into(),
                reason: "key path must not be empty".into(),
            })?;

        let mut current = &mut self.0;
        for segment in parents {
            current = ensure_mapping(current)
                .entry(Value::String((*segment).to_string()))
                .or_insert(Value::Mapping(Mapping::new()));
        }
        ensure_mapping(current).insert(Value::String((*leaf).to_string()), value);
        Ok(())
    }

    /// Parse a `key.path=value` assignment as given to `--set`.
    ///
    /// `true`/`false` become booleans so `vvv=true` toggles a flag; every
    /// other value is kept verbatim as a string.
    pub fn parse_assignment(assignment: &str) -> Result<(String, Value), DomainError> {
        let (key, raw) = assignment
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidValue {
                field: assignment.into(),
                reason: "expected KEY=VALUE".into(),
            })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::InvalidValue {
                field: assignment.into(),
                reason: "key must not be empty".into(),
            });
        }

        let value = match serde_yaml::from_str::<Value>(raw) {
            Ok(Value::Bool(b)) => Value::Bool(b),
            _ => Value::String(raw.to_string()),
        };

        Ok((key.to_string(), value))
    }
}

impl From<Mapping> for RawConfig {
    fn from(map: Mapping) -> Self {
        Self(Value::Mapping(map))
    }
}

/// Replace a non-mapping value with an empty mapping and borrow it.
fn ensure_mapping(value: &mut Value) -> &mut Mapping {
    if !value.is_mapping() {
        *value = Value::Mapping(Mapping::new());
    }
    match value {
        Value::Mapping(map) => map,
        _ => unreachable!("value was replaced with a mapping above"),
    }
}

fn overlay_value(base: &mut Value, over: &Value) {
    match (base, over) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(over_map)) => {
            for (key, over_value) in over_map {
                match base_map.get_mut(key) {
                    Some(existing) => overlay_value(existing, over_value),
                    None => {
                        base_map.insert(key.clone(), over_value.clone());
                    }
                }
            }
        }
        (base, over) => *base = over.clone(),
    }
}

/// Merge `raw` over `defaults`, keeping the shape of `defaults`.
///
/// For each key of `defaults`: a present, non-null, shape-compatible raw
/// value wins; otherwise the default is kept. Numbers and booleans given for
/// string fields are converted to strings.
pub fn whitelist_merge(defaults: &Value, raw: &RawConfig) -> Value {
    merge_at("", defaults, Some(&raw.0))
}

fn merge_at(path: &str, default: &Value, raw: Option<&Value>) -> Value {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return default.clone();
    };

    match (default, raw) {
        (Value::Mapping(default_map), Value::Mapping(raw_map)) => {
            for key in raw_map.keys() {
                if !default_map.contains_key(key) {
                    debug!(key = %join(path, &key_name(key)), "discarding unknown config key");
                }
            }

            let mut out = Mapping::with_capacity(default_map.len());
            for (key, default_value) in default_map {
                let child = join(path, &key_name(key));
                out.insert(
                    key.clone(),
                    merge_at(&child, default_value, raw_map.get(key)),
                );
            }
            Value::Mapping(out)
        }
        (Value::Bool(_), Value::Bool(_)) => raw.clone(),
        (Value::Number(_), Value::Number(_)) => raw.clone(),
        (Value::String(_), Value::String(_)) => raw.clone(),
        (Value::String(_), Value::Number(n)) => Value::String(n.to_string()),
        (Value::String(_), Value::Bool(b)) => Value::String(b.to_string()),
        (default, raw) => {
            warn!(
                key = %path,
                expected = kind_of(default),
                found = kind_of(raw),
                "ignoring config value of the wrong type"
            );
            default.clone()
        }
    }
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
