//! Build `Settings` from defaults overlaid with environment variables.
//!
//! Variable names are case-insensitive and use `__` as the nesting delimiter
//! (`PG__CONNECTION__MAX_SIZE` sets `pg.connection.max_size`). Names that do not
//! address a known field are ignored. A raw value is coerced by the type of the
//! default it replaces.

use crate::error::SettingsError;
use crate::settings::types::{Settings, LOCAL_ENV};
use crate::settings::validate;
use serde_json::{Map, Value};

/// Nesting delimiter in environment variable names.
pub const NESTED_DELIMITER: &str = "__";

impl Settings {
    /// Load from the process environment. When `ENV` is `LOCAL` (or unset), `.env` in the
    /// working directory is read first and the process environment overrides it.
    pub fn load() -> Result<Settings, SettingsError> {
        let env_name = std::env::var("ENV").unwrap_or_else(|_| LOCAL_ENV.into());
        let mut vars: Vec<(String, String)> = Vec::new();
        if env_name.eq_ignore_ascii_case(LOCAL_ENV) {
            match dotenvy::dotenv_iter() {
                Ok(iter) => {
                    for item in iter {
                        vars.push(item.map_err(|e| SettingsError::DotEnv(e.to_string()))?);
                    }
                }
                Err(e) if e.not_found() => {}
                Err(e) => return Err(SettingsError::DotEnv(e.to_string())),
            }
        }
        vars.extend(
            std::env::vars_os().filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        );
        let settings = Settings::from_vars(vars)?;
        validate(&settings)?;
        Ok(settings)
    }

    /// Overlay `vars` on the defaults, in order (later pairs win). Does not validate.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Settings, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut tree = serde_json::to_value(Settings::default())?;
        for (key, raw) in vars {
            let key = key.as_ref();
            let path: Vec<String> = key
                .to_lowercase()
                .split(NESTED_DELIMITER)
                .map(str::to_string)
                .collect();
            if path.iter().any(|p| p.is_empty()) {
                continue;
            }
            let Some(slot) = lookup_mut(&mut tree, &path) else {
                continue;
            };
            let value = coerce(slot, raw.as_ref()).map_err(|reason| SettingsError::Env {
                key: key.to_string(),
                reason,
            })?;
            merge(slot, value);
        }
        Ok(serde_json::from_value(tree)?)
    }
}

fn lookup_mut<'a>(tree: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    path.iter()
        .try_fold(tree, |node, segment| node.as_object_mut()?.get_mut(segment.as_str()))
}

/// Convert a raw string to the JSON type of `current`.
fn coerce(current: &Value, raw: &str) -> Result<Value, String> {
    let trimmed = raw.trim();
    match current {
        Value::Bool(_) => parse_bool(trimmed)
            .map(Value::Bool)
            .ok_or_else(|| format!("expected a boolean, got '{}'", raw)),
        Value::Number(_) => serde_json::from_str::<serde_json::Number>(trimmed)
            .map(Value::Number)
            .map_err(|_| format!("expected a number, got '{}'", raw)),
        Value::Array(_) => {
            if trimmed.starts_with('[') {
                serde_json::from_str::<Vec<Value>>(trimmed)
                    .map(Value::Array)
                    .map_err(|e| format!("invalid JSON list: {}", e))
            } else {
                Ok(Value::Array(
                    trimmed
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| Value::String(s.to_string()))
                        .collect(),
                ))
            }
        }
        Value::Object(_) => serde_json::from_str::<Map<String, Value>>(trimmed)
            .map(Value::Object)
            .map_err(|e| format!("invalid JSON object: {}", e)),
        Value::String(_) | Value::Null => Ok(Value::String(raw.to_string())),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Objects merge key by key; anything else replaces.
fn merge(slot: &mut Value, value: Value) {
    match (slot, value) {
        (Value::Object(target), Value::Object(source)) => {
            for (k, v) in source {
                match target.get_mut(&k) {
                    Some(existing) => merge(existing, v),
                    None => {
                        target.insert(k, v);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
