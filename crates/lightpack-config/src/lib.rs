//! Shared configuration for the Lightpack remote-control daemon.
//!
//! Values are layered by [`ortho_config`]: built-in defaults, then a TOML file
//! (`--config-path` or `LIGHTPACK_CONFIG_PATH`), then `LIGHTPACK_*`
//! environment variables, then command-line flags. The resolved [`Config`]
//! is read once at startup; the daemon exposes its own runtime setters for the
//! values the owning process may change afterwards.

mod defaults;
mod endpoint;
mod logging;

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_API_HOST, DEFAULT_API_PORT, DEFAULT_LED_COUNT, DEFAULT_LOG_FILTER, DEFAULT_PROFILE,
    MAX_LED_COUNT, default_api_endpoint, default_api_host, default_log_filter,
    default_log_filter_string, default_log_format, default_profile,
};
pub use endpoint::{ApiEndpoint, EndpointParseError};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "LIGHTPACK")]
pub struct Config {
    /// Whether the remote-control API accepts connections at all.
    #[ortho_config(default = true)]
    pub api_enabled: bool,
    /// Interface the API listener binds to.
    #[ortho_config(default = defaults::default_api_host())]
    pub api_host: String,
    /// TCP port of the API listener.
    #[ortho_config(default = DEFAULT_API_PORT)]
    pub api_port: u16,
    /// Require `apikey:` before lock or mutation commands.
    #[ortho_config(default = false)]
    pub api_auth_enabled: bool,
    /// Key clients must present when authorization is enabled.
    #[ortho_config(default = String::new())]
    pub api_key: String,
    /// Number of LEDs addressable through `setcolor`.
    #[ortho_config(default = DEFAULT_LED_COUNT)]
    pub led_count: usize,
    /// Profile active when the daemon starts.
    #[ortho_config(default = defaults::default_profile())]
    pub default_profile: String,
    /// `tracing` filter expression.
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_enabled: true,
            api_host: default_api_host(),
            api_port: DEFAULT_API_PORT,
            api_auth_enabled: false,
            api_key: String::new(),
            led_count: DEFAULT_LED_COUNT,
            default_profile: default_profile(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Resolves the configuration from the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns the loader error when a layer fails to parse or merge.
    pub fn load() -> Result<Self, Arc<OrthoError>> {
        <Self as OrthoConfig>::load()
    }

    /// Resolves the configuration from explicit arguments; the first item is
    /// the program name.
    ///
    /// # Errors
    ///
    /// Returns the loader error when a layer fails to parse or merge.
    pub fn load_from_iter<I>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = OsString>,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Endpoint the API listener binds to.
    #[must_use]
    pub fn api_endpoint(&self) -> ApiEndpoint {
        ApiEndpoint::new(self.api_host.clone(), self.api_port)
    }

    /// Number of LEDs addressable through the API.
    #[must_use]
    pub const fn led_count(&self) -> usize {
        self.led_count
    }

    /// Configured `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Configured log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Checks invariants the loader cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LedCount`] when `led_count` is zero or above
    /// [`MAX_LED_COUNT`], and [`ConfigError::EmptyProfile`] when no default
    /// profile name is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.led_count == 0 || self.led_count > MAX_LED_COUNT {
            return Err(ConfigError::LedCount {
                count: self.led_count,
            });
        }
        if self.default_profile.is_empty() {
            return Err(ConfigError::EmptyProfile);
        }
        Ok(())
    }
}

/// Semantic errors in an otherwise well-formed configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// LED count outside `1..=MAX_LED_COUNT`.
    #[error("led_count must be between 1 and {MAX_LED_COUNT}, got {count}")]
    LedCount {
        /// Rejected value.
        count: usize,
    },
    /// The default profile name was empty.
    #[error("default_profile must not be empty")]
    EmptyProfile,
}
