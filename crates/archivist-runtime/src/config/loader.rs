//! Configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Profile-specific config file (`archivist.{profile}.toml`)
//! 3. Main config file (`archivist.toml`)
//! 4. Environment variables (`ARCHIVIST_*`)
//! 5. Programmatic overrides
//!
//! Files are searched in the current directory, then in the user config
//! directory (`~/.config/archivist` on Linux).
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `ARCHIVIST_` prefix with `__` as separator:
//!
//! - `ARCHIVIST_COMMANDS__GUILDS=123,456` → `commands.guilds = [123, 456]`
//! - `ARCHIVIST_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `ARCHIVIST_RUNTIME__MAX_IN_FLIGHT=16` → `runtime.max_in_flight = 16`
//!
//! # Example
//!
//! ```rust,ignore
//! use archivist_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().profile("production").load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::ArchivistConfig;

const ENV_PREFIX: &str = "ARCHIVIST_";
const PROFILE_VAR: &str = "ARCHIVIST_PROFILE";
const CONFIG_DIR: &str = "archivist";
#[cfg(feature = "toml-config")]
const CONFIG_STEM: &str = "archivist";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name, accepting the `dev` and `prod` short forms.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads `ARCHIVIST_PROFILE`, defaulting to Development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_VAR)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    figment: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges configuration programmatically, above every other source.
    pub fn merge(mut self, config: ArchivistConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads and returns the configuration.
    pub fn load(self) -> ConfigResult<ArchivistConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: ArchivistConfig = figment.extract().map_err(|e| {
            ConfigError::ParseError(format!("Failed to extract configuration: {e}"))
        })?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            guilds = config.commands.guilds.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(ArchivistConfig::default()));

        if let Some(path) = self.config_file.take() {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, &path)?;
        } else {
            figment = self.load_config_files(figment);
        }

        if self.load_env {
            trace!("Loading environment variables with {ENV_PREFIX} prefix");
            figment = figment.merge(
                Env::prefixed(ENV_PREFIX)
                    .ignore(&["PROFILE"])
                    .split("__"),
            );
        }

        // Programmatic overrides win over files and environment.
        let overrides = std::mem::take(&mut self.figment);
        Ok(figment.merge(overrides))
    }

    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            _ => Err(ConfigError::ParseError(format!(
                "Unsupported or disabled configuration file format: .{ext}"
            ))),
        }
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(CONFIG_DIR));
        }
        paths
    }

    /// Merges the first `archivist.toml` found, preceded by its profile
    /// variant when one sits next to it.
    #[cfg(feature = "toml-config")]
    fn load_config_files(&self, mut figment: Figment) -> Figment {
        for search_path in self.resolve_search_paths() {
            let profile_path =
                search_path.join(format!("{CONFIG_STEM}.{}.toml", self.profile.as_str()));
            if profile_path.exists() {
                debug!(path = %profile_path.display(), "Loading profile-specific config");
                figment = figment.merge(Toml::file(&profile_path));
            }

            let base_path = search_path.join(format!("{CONFIG_STEM}.toml"));
            if base_path.exists() {
                info!(path = %base_path.display(), "Loading configuration file");
                return figment.merge(Toml::file(&base_path));
            }
        }

        warn!("No configuration file found, using defaults");
        figment
    }

    #[cfg(not(feature = "toml-config"))]
    fn load_config_files(&self, figment: Figment) -> Figment {
        trace!(paths = ?self.resolve_search_paths(), "File configuration disabled");
        figment
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<ArchivistConfig> {
    ConfigLoader::new().load()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use archivist_core::GroupId;

    use super::*;
    use crate::config::schema::{LogLevel, RuntimeConfig};

    #[test]
    fn test_default_config() {
        let config = ConfigLoader::new()
            .search_path("/nonexistent")
            .without_env()
            .load()
            .unwrap();

        assert_eq!(config, ArchivistConfig::default());
        assert_eq!(config.logging.level.as_str(), "info");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = ConfigLoader::new()
            .file("/nonexistent/archivist.toml")
            .without_env()
            .load()
            .unwrap_err();

        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_programmatic_merge_overrides_defaults() {
        let mut overrides = ArchivistConfig::default();
        overrides.commands.guilds = vec![GroupId(42)];
        overrides.logging.level = LogLevel::Debug;
        overrides.runtime = RuntimeConfig { max_in_flight: 4 };

        let config = ConfigLoader::new()
            .search_path("/nonexistent")
            .without_env()
            .merge(overrides.clone())
            .load()
            .unwrap();

        assert_eq!(config, overrides);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_source() {
        let figment = Figment::from(Serialized::defaults(ArchivistConfig::default())).merge(
            Toml::string(
                r#"
                [commands]
                guilds = "111, 222"

                [logging]
                level = "warn"
                format = "pretty"

                [logging.filters]
                archivist_core = "trace"
                "#,
            ),
        );
        let config: ArchivistConfig = figment.extract().unwrap();

        assert_eq!(config.commands.guilds, [GroupId(111), GroupId(222)]);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.filters["archivist_core"], LogLevel::Trace);
        assert_eq!(config.runtime.max_in_flight, 64);
    }

    #[test]
    fn test_guilds_from_env() {
        let load = || {
            ConfigLoader::new()
                .search_path("/nonexistent")
                .load()
                .map(|config| config.commands.guilds)
        };

        // SAFETY: No other test in this crate reads ARCHIVIST_COMMANDS__GUILDS,
        // and the variable is removed before returning.
        unsafe {
            std::env::set_var("ARCHIVIST_COMMANDS__GUILDS", "123,456");
        }
        let joined = load();
        unsafe {
            std::env::set_var("ARCHIVIST_COMMANDS__GUILDS", "789");
        }
        let single = load();
        unsafe {
            std::env::remove_var("ARCHIVIST_COMMANDS__GUILDS");
        }

        assert_eq!(joined.unwrap(), [GroupId(123), GroupId(456)]);
        assert_eq!(single.unwrap(), [GroupId(789)]);
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!(Profile::parse("prod"), Profile::Production);
        assert_eq!(Profile::parse("Dev"), Profile::Development);
        assert_eq!(Profile::parse("staging"), Profile::Custom("staging".into()));
    }
}
