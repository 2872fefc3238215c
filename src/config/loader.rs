//! Configuration loading functionality
//!
//! Sources are layered with the `config` crate, lowest priority first:
//!
//! 1. Default values (serde defaults on `ProxyConfig`)
//! 2. JSON configuration file
//! 3. Environment variables prefixed with `MCP_PROXY_`
//!
//! Command line arguments are applied afterwards with
//! [`ProxyConfig::with_overrides`](super::ProxyConfig::with_overrides).

use std::path::Path;
use log::debug;
use ::config::{Config, Environment, File, FileFormat};

use super::defaults;
use super::error::{ConfigError, Result};
use super::ProxyConfig;

impl ProxyConfig {
    /// Load configuration from file and environment
    ///
    /// # Parameters
    ///
    /// * `config_file` - Explicit configuration file. When `None`,
    ///   `mcp-proxy.json` in the working directory is used if present.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file does not exist, or if a
    /// source cannot be parsed into a `ProxyConfig`.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::FileNotFound(path.to_path_buf()));
                }
                debug!("Loading configuration from {}", path.display());
                builder = builder.add_source(File::from(path).format(FileFormat::Json).required(true));
            }
            None => {
                let default_path = Path::new(defaults::DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    debug!("Loading configuration from {}", default_path.display());
                    builder = builder.add_source(File::from(default_path).format(FileFormat::Json));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("server_args"),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }
}
