//! Configuration validator
//!
//! This module provides functionality for validating configuration.

use log::warn;

use super::defaults;
use super::error::{ConfigError, Result};
use super::ProxyConfig;

impl ProxyConfig {
    /// Validate the configuration
    ///
    /// Unknown log levels are only warned about; `env_logger` falls back
    /// to its own default for them.
    pub fn validate(&self) -> Result<()> {
        validate_server_settings(self)?;
        validate_transport_settings(self)?;
        validate_general_settings(self);
        Ok(())
    }
}

/// Validate backend server settings
fn validate_server_settings(config: &ProxyConfig) -> Result<()> {
    if config.server_command.trim().is_empty() {
        return Err(ConfigError::MissingRequiredValue("server_command".to_string()));
    }

    if let Some(cwd) = &config.server_cwd {
        if !cwd.is_dir() {
            return Err(ConfigError::InvalidValue(
                "server_cwd".to_string(),
                format!("Directory does not exist: {}", cwd.display()),
            ));
        }
    }

    Ok(())
}

/// Validate channel and framing settings
fn validate_transport_settings(config: &ProxyConfig) -> Result<()> {
    if config.channel_capacity == 0 {
        return Err(ConfigError::InvalidValue(
            "channel_capacity".to_string(),
            "Channel capacity must be greater than 0".to_string(),
        ));
    }

    if config.max_message_size < defaults::MIN_MESSAGE_SIZE {
        return Err(ConfigError::InvalidValue(
            "max_message_size".to_string(),
            format!("Maximum message size must be at least {} bytes", defaults::MIN_MESSAGE_SIZE),
        ));
    }

    Ok(())
}

/// Validate general settings
fn validate_general_settings(config: &ProxyConfig) {
    match config.log_level.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" => {}
        level => {
            warn!("Invalid log level: {}. Using default: {}", level, defaults::LOG_LEVEL_STR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn valid_config() -> ProxyConfig {
        ProxyConfig {
            server_command: "uv".to_string(),
            ..ProxyConfig::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_server_command() {
        let config = ProxyConfig::default();
        match config.validate() {
            Err(ConfigError::MissingRequiredValue(name)) => assert_eq!(name, "server_command"),
            other => panic!("Expected missing server_command, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_channel_capacity() {
        let config = ProxyConfig {
            channel_capacity: 0,
            ..valid_config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(name, _)) if name == "channel_capacity"));
    }

    #[test]
    fn test_tiny_message_size() {
        let config = ProxyConfig {
            max_message_size: 10,
            ..valid_config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(name, _)) if name == "max_message_size"));
    }

    #[test]
    fn test_missing_working_directory() {
        let config = ProxyConfig {
            server_cwd: Some(PathBuf::from("/nonexistent/mcp-proxy-test-dir")),
            ..valid_config()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(name, _)) if name == "server_cwd"));
    }

    #[test]
    fn test_unknown_log_level_is_not_fatal() {
        let config = ProxyConfig {
            log_level: "verbose".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_ok());
    }
}
