use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::config::DEFAULT_SENSITIVE_KEYS;

/// Placeholder written instead of a sensitive value
pub const REDACTED: &str = "***REDACTED***";

/// Set of field names whose values must never reach trace output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionPolicy {
    keys: HashSet<String>,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self::from_keys(DEFAULT_SENSITIVE_KEYS)
    }
}

impl RedactionPolicy {
    /// Keys are matched case-insensitively.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        self.keys.contains(&key.to_lowercase())
    }

    /// Shallow copy of `map` with sensitive values replaced by [`REDACTED`]
    pub fn redact_map(&self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| {
                let value = if self.is_sensitive(key) {
                    Value::String(REDACTED.to_string())
                } else {
                    value.clone()
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// Non-object values are returned unchanged.
    pub fn redact(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.redact_map(map)),
            other => other.clone(),
        }
    }
}
