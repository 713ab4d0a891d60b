//! Resolved command options.
//!
//! The gateway resolves each invocation's arguments into a name → value map.
//! Transports disagree on how they spell option names (`url`, `URL`, the
//! symbol-like `:url`), so keys are folded into one canonical form when the
//! map is built. Every later lookup is then a single map access.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    String,
    Integer,
    Boolean,
}

impl OptionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed option value supplied with an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            Self::Boolean(_) => OptionKind::Boolean,
            Self::Integer(_) => OptionKind::Integer,
            Self::String(_) => OptionKind::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Folds an option name into its canonical form.
///
/// Surrounding whitespace and a leading symbol marker are dropped and ASCII
/// letters are lowercased, so `url`, `URL` and `:url` all become `url`.
pub fn canonical_key(key: &str) -> String {
    key.trim().trim_start_matches(':').to_ascii_lowercase()
}

/// The option map of one invocation, keyed canonically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "HashMap<String, OptionValue>",
    into = "HashMap<String, OptionValue>"
)]
pub struct ResolvedOptions {
    values: HashMap<String, OptionValue>,
}

impl ResolvedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, canonicalizing its key.
    pub fn insert(&mut self, key: &str, value: impl Into<OptionValue>) {
        self.values.insert(canonical_key(key), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Looks up a value by any spelling of its name.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(&canonical_key(key))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over canonical names and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<HashMap<String, OptionValue>> for ResolvedOptions {
    fn from(raw: HashMap<String, OptionValue>) -> Self {
        raw.into_iter().collect()
    }
}

impl From<ResolvedOptions> for HashMap<String, OptionValue> {
    fn from(options: ResolvedOptions) -> Self {
        options.values
    }
}

impl<K: AsRef<str>> FromIterator<(K, OptionValue)> for ResolvedOptions {
    fn from_iter<I: IntoIterator<Item = (K, OptionValue)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.insert(key.as_ref(), value);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_under_either_representation() {
        let by_string = ResolvedOptions::new().with("ident", "abc123");
        let by_symbol = ResolvedOptions::new().with(":ident", "abc123");

        for options in [&by_string, &by_symbol] {
            assert_eq!(options.get("ident").and_then(OptionValue::as_str), Some("abc123"));
            assert_eq!(options.get(":ident").and_then(OptionValue::as_str), Some("abc123"));
        }
    }

    #[test]
    fn test_absent_under_neither_representation() {
        let options = ResolvedOptions::new().with("url", "https://example.com");
        assert!(options.get("ident").is_none());
        assert!(options.get(":ident").is_none());
    }

    #[test]
    fn test_case_folding() {
        let options = ResolvedOptions::new().with(" URL ", "x");
        assert!(options.get("url").is_some());
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_collect_canonicalizes_keys() {
        let options: ResolvedOptions = [
            (":Level", OptionValue::Integer(4)),
            ("enabled", OptionValue::Boolean(true)),
        ]
        .into_iter()
        .collect();

        assert_eq!(options.get("level").and_then(OptionValue::as_i64), Some(4));
        assert_eq!(options.get("enabled").and_then(OptionValue::as_bool), Some(true));
        assert_eq!(options.get("enabled").map(OptionValue::kind), Some(OptionKind::Boolean));
    }
}
