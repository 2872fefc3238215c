//! Default configuration values
//!
//! This module provides default values for configuration options.
//! It is designed to be a single source of truth for defaults,
//! making it easier to maintain consistent defaults across the application.

/// Environment variable prefix for all configuration options
///
/// `MCP_PROXY_LOG_LEVEL` sets `log_level`, and so on.
pub const ENV_PREFIX: &str = "MCP_PROXY";

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "mcp-proxy.json";

/// Default log level as string
pub const LOG_LEVEL_STR: &str = "info";

/// Smallest accepted `max_message_size`
pub const MIN_MESSAGE_SIZE: usize = 1024;

/// Default log level
pub fn log_level() -> String {
    LOG_LEVEL_STR.to_string()
}

/// Message inspection is on unless disabled
pub fn inspect() -> bool {
    true
}

/// Default bound for transport channels
pub fn channel_capacity() -> usize {
    16
}

/// Default maximum message size (8 MiB)
pub fn max_message_size() -> usize {
    8 * 1024 * 1024
}

/// Default grace period for the backend server to exit, in milliseconds
pub fn shutdown_timeout_ms() -> u64 {
    2000
}
