//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{ArchivistConfig, CommandsConfig, LogOutput, LoggingConfig, RuntimeConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &ArchivistConfig) -> ConfigResult<()> {
    validate_commands_config(&config.commands)?;
    validate_logging_config(&config.logging)?;
    validate_runtime_config(&config.runtime)?;
    Ok(())
}

fn validate_commands_config(commands: &CommandsConfig) -> ConfigResult<()> {
    if commands.guilds.iter().any(|id| id.get() == 0) {
        return Err(ConfigError::InvalidGuildId("0".to_string()));
    }
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output is \"file\"",
        ));
    }
    Ok(())
}

fn validate_runtime_config(runtime: &RuntimeConfig) -> ConfigResult<()> {
    if runtime.max_in_flight == 0 {
        return Err(ConfigError::validation(
            "runtime.max_in_flight must be greater than 0",
        ));
    }
    Ok(())
}
