//! Test configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::OrthoError;
use lightpack_config::Config;

use crate::bootstrap::ConfigLoader;

/// Loader binding the API to an ephemeral loopback port.
#[derive(Debug, Clone)]
pub struct TestConfigLoader {
    config: Config,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config {
                api_host: "127.0.0.1".to_owned(),
                api_port: 0,
                ..Config::default()
            },
        }
    }

    /// Requires `key` before gated commands.
    #[must_use]
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.config.api_auth_enabled = true;
        self.config.api_key = key.to_owned();
        self
    }

    /// Starts with the API listener disabled.
    #[must_use]
    pub fn with_api_disabled(mut self) -> Self {
        self.config.api_enabled = false;
        self
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Loader that intentionally fails by passing invalid CLI arguments.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("lightpackd"),
            OsString::from("--api-port"),
            OsString::from("not-a-port"),
        ];
        Config::load_from_iter(args)
    }
}

/// Loader producing a configuration that parses but cannot drive a device.
pub struct InvalidConfigLoader;

impl ConfigLoader for InvalidConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            led_count: 0,
            ..Config::default()
        })
    }
}
