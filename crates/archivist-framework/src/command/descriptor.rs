use std::collections::HashSet;

use archivist_core::OptionKind;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{RegistryError, RegistryResult};

const MAX_NAME_LEN: usize = 32;
const MAX_DESCRIPTION_LEN: usize = 100;
const MAX_OPTIONS: usize = 25;

/// One typed option a command accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    pub required: bool,
}

impl OptionSpec {
    /// Platform wire code for the option's type.
    fn type_code(&self) -> u8 {
        match self.kind {
            OptionKind::String => 3,
            OptionKind::Integer => 4,
            OptionKind::Boolean => 5,
        }
    }
}

/// A command's name, description and option schema.
///
/// ```rust,ignore
/// let descriptor = CommandDescriptor::new("set_delay", "Set delay bounds for a job")
///     .string("ident", "Job identifier", true)
///     .integer("min", "Minimum delay in milliseconds", true)
///     .integer("max", "Maximum delay in milliseconds", true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    name: String,
    description: String,
    #[serde(default)]
    options: Vec<OptionSpec>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    fn option(
        mut self,
        kind: OptionKind,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.options.push(OptionSpec {
            name: name.into(),
            description: description.into(),
            kind,
            required,
        });
        self
    }

    /// Adds a string option.
    #[must_use]
    pub fn string(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.option(OptionKind::String, name, description, required)
    }

    /// Adds an integer option.
    #[must_use]
    pub fn integer(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.option(OptionKind::Integer, name, description, required)
    }

    /// Adds a boolean option.
    #[must_use]
    pub fn boolean(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.option(OptionKind::Boolean, name, description, required)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the options in declaration order.
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Looks up an option spec by name.
    pub fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Checks the descriptor against the platform's registration rules.
    pub fn validate(&self) -> RegistryResult<()> {
        let invalid = |reason: String| RegistryError::invalid(&self.name, reason);

        check_name(&self.name).map_err(|r| invalid(format!("command name {r}")))?;
        check_description(&self.description).map_err(|r| invalid(format!("description {r}")))?;

        if self.options.len() > MAX_OPTIONS {
            return Err(invalid(format!("more than {MAX_OPTIONS} options")));
        }

        let mut seen = HashSet::new();
        let mut optional_seen = false;
        for option in &self.options {
            check_name(&option.name).map_err(|r| invalid(format!("option name {r}")))?;
            check_description(&option.description)
                .map_err(|r| invalid(format!("option `{}` description {r}", option.name)))?;
            if !seen.insert(option.name.as_str()) {
                return Err(invalid(format!("duplicate option `{}`", option.name)));
            }
            if option.required && optional_seen {
                return Err(invalid(format!(
                    "required option `{}` follows an optional one",
                    option.name
                )));
            }
            optional_seen |= !option.required;
        }

        Ok(())
    }

    /// Renders the descriptor as a platform registration payload.
    pub fn to_payload(&self) -> Value {
        let options: Vec<Value> = self
            .options
            .iter()
            .map(|o| {
                json!({
                    "type": o.type_code(),
                    "name": o.name,
                    "description": o.description,
                    "required": o.required,
                })
            })
            .collect();

        json!({
            "type": 1,
            "name": self.name,
            "description": self.description,
            "options": options,
        })
    }
}

fn check_name(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(format!("`{name}` must be 1-{MAX_NAME_LEN} characters"));
    }
    let valid = name
        .chars()
        .all(|c| c == '-' || c == '_' || (c.is_alphanumeric() && !c.is_uppercase()));
    if !valid {
        return Err(format!(
            "`{name}` may only contain lowercase letters, digits, `-` and `_`"
        ));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), String> {
    let len = description.chars().count();
    if len == 0 || len > MAX_DESCRIPTION_LEN {
        return Err(format!("must be 1-{MAX_DESCRIPTION_LEN} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let descriptor = CommandDescriptor::new("set_delay", "Set delay bounds for a job")
            .string("ident", "Job identifier", true)
            .integer("min", "Minimum delay in milliseconds", true)
            .integer("max", "Maximum delay in milliseconds", true);

        let names: Vec<_> = descriptor.options().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["ident", "min", "max"]);
        assert_eq!(descriptor.find_option("min").map(|o| o.kind), Some(OptionKind::Integer));
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_names() {
        for name in ["", "Archive", "archive now", "x".repeat(33).as_str()] {
            let err = assert_err!(CommandDescriptor::new(name, "desc").validate());
            assert!(matches!(err, RegistryError::InvalidDescriptor { .. }), "{name}");
        }
    }

    #[test]
    fn test_description_length_limits() {
        assert!(CommandDescriptor::new("expire", "x".repeat(100)).validate().is_ok());

        for description in [String::new(), "x".repeat(101)] {
            let err = assert_err!(CommandDescriptor::new("expire", description).validate());
            assert!(err.to_string().contains("description must be 1-100 characters"));
        }
    }

    #[test]
    fn test_option_count_limit() {
        let with_options = |count: usize| {
            (0..count).fold(CommandDescriptor::new("ignoreset", "Apply ignore sets"), |d, i| {
                d.string(format!("set{i}"), "Set name", false)
            })
        };

        assert!(with_options(25).validate().is_ok());
        let err = assert_err!(with_options(26).validate());
        assert!(err.to_string().contains("more than 25 options"));
    }

    #[test]
    fn test_rejects_duplicate_options() {
        let descriptor = CommandDescriptor::new("ignore", "Add an ignore pattern")
            .string("ident", "Job identifier", true)
            .string("ident", "Again", true);
        let err = assert_err!(descriptor.validate());
        assert!(err.to_string().contains("duplicate option `ident`"));
    }

    #[test]
    fn test_rejects_required_after_optional() {
        let descriptor = CommandDescriptor::new("archive", "Queue a URL")
            .string("parameters", "Optional job parameters", false)
            .string("url", "URL to archive", true);
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn test_payload_shape() {
        let payload = CommandDescriptor::new("ignore_reports", "Toggle reports")
            .string("ident", "Job identifier", true)
            .boolean("enabled", "Enable reports", true)
            .to_payload();

        assert_eq!(payload["name"], "ignore_reports");
        assert_eq!(payload["options"][0]["type"], 3);
        assert_eq!(payload["options"][1]["type"], 5);
        assert_eq!(payload["options"][1]["required"], true);
    }
}
