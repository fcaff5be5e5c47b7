//! Client configuration
//!
//! Loaded in layers:
//! 1. Default values in code
//! 2. Optional `config/client.toml`
//! 3. Environment variable overrides with the FEEDMILL_CLIENT prefix
//!    (e.g. `FEEDMILL_CLIENT__BASE_URL`)

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Base URL of the composition API, including the version prefix
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .add_source(File::with_name("config/client").required(false))
            .add_source(
                Environment::with_prefix("FEEDMILL_CLIENT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
