//! Configuration module
//!
//! This module handles application configuration, including loading from
//! different sources (files, environment variables, command line arguments)
//! and validating the configuration.

pub mod defaults;
mod error;
mod loader;
mod merger;
mod validator;

pub use self::error::{ConfigError, Result};
pub use self::merger::ConfigOverrides;
pub use defaults::{ENV_PREFIX, DEFAULT_CONFIG_FILE};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::transport::ServerParameters;

/// Proxy configuration
///
/// Contains all configuration options needed by the proxy binary.
/// Supports loading from configuration files, environment variables,
/// and command-line arguments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProxyConfig {
    // --- Backend server ---

    /// Command that starts the backend MCP server
    pub server_command: String,

    /// Arguments for the server command
    pub server_args: Vec<String>,

    /// Extra environment variables for the backend server
    pub server_env: BTreeMap<String, String>,

    /// Working directory for the backend server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_cwd: Option<PathBuf>,

    /// Grace period for the backend server to exit on shutdown, in milliseconds
    pub shutdown_timeout_ms: u64,

    // --- Proxy behaviour ---

    /// Log every forwarded message (method and id)
    pub inspect: bool,

    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,

    // --- Transport sizing ---

    /// Bound of every transport channel
    pub channel_capacity: usize,

    /// Longest accepted message line, in bytes
    pub max_message_size: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            server_command: String::new(),
            server_args: Vec::new(),
            server_env: BTreeMap::new(),
            server_cwd: None,
            shutdown_timeout_ms: defaults::shutdown_timeout_ms(),
            inspect: defaults::inspect(),
            log_level: defaults::log_level(),
            channel_capacity: defaults::channel_capacity(),
            max_message_size: defaults::max_message_size(),
        }
    }
}

impl ProxyConfig {
    /// Launch parameters for the backend server
    pub fn server_parameters(&self) -> ServerParameters {
        ServerParameters {
            command: self.server_command.clone(),
            args: self.server_args.clone(),
            env: self.server_env.clone(),
            cwd: self.server_cwd.clone(),
        }
    }

    /// Shutdown grace period as a `Duration`
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}
