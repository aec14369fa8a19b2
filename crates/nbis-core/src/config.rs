//! # Config: Ordered Configuration Value Tree
//!
//! A [`Config`] is the materialized, concrete configuration of a project:
//! an insertion-ordered mapping from property name to value, where a value
//! is a scalar, a nested mapping, or a list.
//!
//! ## Access
//!
//! Values are reached by key ([`Config::get`]) or by dotted path
//! ([`Config::get_path`]). The two are the same lookup: every key is a
//! valid path (including keys that contain a `.`), and each further segment
//! descends one mapping. There is no second index to fall out of sync.
//!
//! ## Mutation
//!
//! [`Config::insert`] appends a new key or overwrites an existing one in
//! place. Removing keys is not part of the contract.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Separator for nested key paths.
pub const PATH_SEPARATOR: char = '.';

/// Insertion-ordered configuration value tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(Map<String, Value>);

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing mapping.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a value by dotted path, e.g. `webexport.url`.
    ///
    /// At each level the whole remaining path is tried as a key before it is
    /// split, so a key that itself contains a `.` is found both by
    /// [`Config::get`] and by `get_path`. Returns `None` if no split of the
    /// path leads to a value.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        resolve_path(&self.0, path)
    }

    /// Deserialize the value at `path` into a concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] when the path is absent and
    /// [`ConfigError::TypeMismatch`] when the value has the wrong shape.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let value = self.get_path(path).ok_or_else(|| ConfigError::MissingKey {
            path: path.to_string(),
        })?;
        T::deserialize(value).map_err(|e| ConfigError::TypeMismatch {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Return the nested mapping at `path` as its own `Config`.
    ///
    /// `None` if the path is absent or does not hold a mapping.
    pub fn section(&self, path: &str) -> Option<Config> {
        self.get_path(path)
            .and_then(Value::as_object)
            .map(|map| Config(map.clone()))
    }

    /// Set a top-level key. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Overlay the top-level keys of `other` onto this configuration.
    ///
    /// Nested mappings are replaced as a whole, not merged.
    pub fn extend(&mut self, other: Config) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Returns true if the top-level key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Top-level keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Top-level entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no top-level keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Copy the tree into a plain `Value::Object`.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Consume and return the underlying mapping.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Config {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Config {
    type Error = ConfigError;

    /// A mapping becomes a `Config`; `null` (an empty YAML document) becomes
    /// an empty one. Anything else is rejected.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigError::NotAMapping {
                found: value_kind(&other),
            }),
        }
    }
}

impl FromIterator<(String, Value)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn resolve_path<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(path) {
        return Some(value);
    }
    path.match_indices(PATH_SEPARATOR).find_map(|(at, _)| {
        map.get(&path[..at])
            .and_then(Value::as_object)
            .and_then(|inner| resolve_path(inner, &path[at + 1..]))
    })
}

/// Short name of a value's variant, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
