//! Command line overrides
//!
//! Values given on the command line take priority over every other source.

use super::ProxyConfig;

/// Values supplied on the command line
///
/// `None` leaves the loaded value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub server_command: Option<String>,
    /// Replaces the configured arguments entirely
    pub server_args: Option<Vec<String>>,
    pub inspect: Option<bool>,
    pub log_level: Option<String>,
}

impl ProxyConfig {
    /// Apply command line overrides
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(command) = overrides.server_command {
            self.server_command = command;
        }
        if let Some(args) = overrides.server_args {
            self.server_args = args;
        }
        if let Some(inspect) = overrides.inspect {
            self.inspect = inspect;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        self
    }
}
