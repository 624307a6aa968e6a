//! Free-form per-node configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration key holding a node's display label.
pub const LABEL_KEY: &str = "label";

/// Configuration key holding a text node's template content.
pub const TEXT_CONTENT_KEY: &str = "value";

/// Key/value configuration attached to a node (`data` in documents).
///
/// Values are arbitrary JSON; updates merge shallowly at the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeConfig(Map<String, Value>);

impl NodeConfig {
    /// Creates an empty configuration.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value stored under `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Removes the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Overwrites top-level keys with those from `patch`.
    ///
    /// Nested objects are replaced wholesale, never merged.
    pub fn merge(&mut self, patch: NodeConfig) {
        for (key, value) in patch.0 {
            self.0.insert(key, value);
        }
    }

    /// Returns the display label, if any.
    #[inline]
    pub fn label(&self) -> Option<&str> {
        self.get_str(LABEL_KEY)
    }

    /// Returns the text template content, or an empty string.
    #[inline]
    pub fn text_content(&self) -> &str {
        self.get_str(TEXT_CONTENT_KEY).unwrap_or_default()
    }

    /// Returns the number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the configuration has no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for NodeConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<NodeConfig> for Map<String, Value> {
    fn from(config: NodeConfig) -> Self {
        config.0
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for NodeConfig {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
