//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use archivist_core::GroupId;
use archivist_framework::CommandScope;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchivistConfig {
    /// Command registration settings.
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Dispatch loop settings.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

// =============================================================================
// Commands
// =============================================================================

/// Where commands are registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Group ids to register commands in. Empty registers them globally.
    ///
    /// Accepts a list (`[123, "456"]`) or a comma-separated string
    /// (`"123, 456"`), which is how the environment usually supplies it.
    #[serde(default, deserialize_with = "deserialize_guilds")]
    pub guilds: Vec<GroupId>,
}

impl CommandsConfig {
    /// Returns the registration scope these settings describe.
    pub fn scope(&self) -> CommandScope {
        CommandScope::groups(self.guilds.iter().copied())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GuildEntry {
    Id(u64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GuildList {
    List(Vec<GuildEntry>),
    Single(u64),
    Joined(String),
}

fn parse_guild(entry: &str) -> Option<Result<GroupId, String>> {
    let entry = entry.trim();
    (!entry.is_empty()).then(|| entry.parse().map_err(|_| entry.to_string()))
}

fn deserialize_guilds<'de, D>(deserializer: D) -> Result<Vec<GroupId>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed: Result<Vec<GroupId>, String> = match GuildList::deserialize(deserializer)? {
        GuildList::Single(id) => Ok(vec![GroupId(id)]),
        GuildList::Joined(joined) => joined.split(',').filter_map(parse_guild).collect(),
        GuildList::List(entries) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                GuildEntry::Id(id) => Some(Ok(GroupId(id))),
                GuildEntry::Text(text) => parse_guild(&text),
            })
            .collect(),
    };
    parsed.map_err(|entry| D::Error::custom(format!("invalid guild id `{entry}`")))
}

// =============================================================================
// Runtime
// =============================================================================

/// Dispatch loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Maximum number of interactions handled at once.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_max_in_flight() -> usize {
    64
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to the equivalent `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to `Full` without it.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Appends to `file_path`.
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Log file, required when `output` is `file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Include thread ids in log lines.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line in log lines.
    #[serde(default)]
    pub file_location: bool,

    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Per-target levels, e.g. `archivist_core = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}
