//! Typed option extraction.
//!
//! [`OptionExtractor`] reads typed values out of an invocation's
//! [`ResolvedOptions`]. Keys are already canonical, so every accessor is a
//! single lookup followed by a type check.
//!
//! ```rust,ignore
//! let options = OptionExtractor::new(message.options());
//! let url = options.require_string("url")?;
//! let params = options.string_or_default("parameters")?;
//! ```

use archivist_core::{OptionKind, OptionValue, ResolvedOptions};

use crate::error::{OptionError, OptionResult};

/// Typed read access to one invocation's options.
#[derive(Debug, Clone, Copy)]
pub struct OptionExtractor<'a> {
    options: &'a ResolvedOptions,
}

impl<'a> OptionExtractor<'a> {
    pub fn new(options: &'a ResolvedOptions) -> Self {
        Self { options }
    }

    /// Returns the raw value, or `None` if the option is absent.
    pub fn get(&self, key: &str) -> Option<&'a OptionValue> {
        self.options.get(key)
    }

    fn typed<T>(
        &self,
        key: &str,
        expected: OptionKind,
        read: impl FnOnce(&'a OptionValue) -> Option<T>,
    ) -> OptionResult<Option<T>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        read(value).map(Some).ok_or_else(|| OptionError::TypeMismatch {
            name: key.to_string(),
            expected,
            actual: value.kind(),
        })
    }

    pub fn string(&self, key: &str) -> OptionResult<Option<&'a str>> {
        self.typed(key, OptionKind::String, OptionValue::as_str)
    }

    pub fn integer(&self, key: &str) -> OptionResult<Option<i64>> {
        self.typed(key, OptionKind::Integer, OptionValue::as_i64)
    }

    pub fn boolean(&self, key: &str) -> OptionResult<Option<bool>> {
        self.typed(key, OptionKind::Boolean, OptionValue::as_bool)
    }

    /// Returns a string option, treating an empty value as absent.
    pub fn non_empty_string(&self, key: &str) -> OptionResult<Option<&'a str>> {
        Ok(self.string(key)?.filter(|s| !s.is_empty()))
    }

    pub fn require_string(&self, key: &str) -> OptionResult<&'a str> {
        self.string(key)?.ok_or_else(|| OptionError::missing(key))
    }

    pub fn require_integer(&self, key: &str) -> OptionResult<i64> {
        self.integer(key)?.ok_or_else(|| OptionError::missing(key))
    }

    pub fn require_boolean(&self, key: &str) -> OptionResult<bool> {
        self.boolean(key)?.ok_or_else(|| OptionError::missing(key))
    }

    /// Returns an optional string option, defaulting to `""`.
    pub fn string_or_default(&self, key: &str) -> OptionResult<&'a str> {
        Ok(self.string(key)?.unwrap_or_default())
    }

    /// Returns an optional boolean option, defaulting to `false`.
    pub fn boolean_or_default(&self, key: &str) -> OptionResult<bool> {
        Ok(self.boolean(key)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn options() -> ResolvedOptions {
        ResolvedOptions::new()
            .with(":ident", "abc123")
            .with("level", 4_i64)
            .with("enabled", true)
            .with("url", "")
            .with("sets", "  ")
    }

    #[test]
    fn test_finds_values_under_either_key_form() {
        let options = options();
        let extractor = OptionExtractor::new(&options);

        assert_eq!(assert_ok!(extractor.string("ident")), Some("abc123"));
        assert_eq!(assert_ok!(extractor.string(":ident")), Some("abc123"));
        assert_eq!(assert_ok!(extractor.integer(":level")), Some(4));
        assert_eq!(assert_ok!(extractor.string("note")), None);
    }

    #[test]
    fn test_required_options() {
        let options = options();
        let extractor = OptionExtractor::new(&options);

        assert!(assert_ok!(extractor.require_boolean("enabled")));
        assert_eq!(
            assert_err!(extractor.require_string("pattern")),
            OptionError::missing("pattern")
        );
    }

    #[test]
    fn test_type_mismatch() {
        let options = options();
        let extractor = OptionExtractor::new(&options);

        let err = assert_err!(extractor.require_integer("ident"));
        assert_eq!(
            err,
            OptionError::TypeMismatch {
                name: "ident".into(),
                expected: OptionKind::Integer,
                actual: OptionKind::String,
            }
        );
        assert_eq!(err.to_string(), "Option `ident` expects integer, got string.");
    }

    #[test]
    fn test_defaults_for_optional_options() {
        let options = options();
        let extractor = OptionExtractor::new(&options);

        assert_eq!(assert_ok!(extractor.string_or_default("parameters")), "");
        assert!(!assert_ok!(extractor.boolean_or_default("missing")));
        assert_eq!(assert_ok!(extractor.non_empty_string("url")), None);
        assert_eq!(assert_ok!(extractor.non_empty_string("sets")), Some("  "));
        assert_eq!(assert_ok!(extractor.non_empty_string("ident")), Some("abc123"));
    }
}
