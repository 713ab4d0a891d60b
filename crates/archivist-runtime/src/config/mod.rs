//! Configuration for the Archivist runtime.
//!
//! Settings are layered with figment (defaults, `archivist.toml`, then
//! `ARCHIVIST_*` environment variables) and checked by [`validate_config`]
//! before the runtime starts.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config};
pub use schema::{
    ArchivistConfig, CommandsConfig, LogFormat, LogLevel, LogOutput, LoggingConfig,
    RuntimeConfig, SpanEventConfig,
};
pub use validation::validate_config;
