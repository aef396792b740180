use nfc_util::result_ext::ResultExt as _;
use serde::Deserialize;

use crate::discovery::DEFAULT_ORIGIN;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct BridgeConfig {
    /// Platform tag attached to every discovery, `android` or `ios`
    pub origin: String,

    /// Keep discoveries made while the app was being launched for [`crate::bridge::NfcBridge::startup_data`]
    pub cache_startup_data: bool,

    /// Overrides `RUST_LOG` when set
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Error, thiserror::Error)]
#[uniffi::export(Display)]
pub enum ConfigError {
    #[error("unable to parse bridge config: {0}")]
    Parse(String),

    #[error("origin must not be empty")]
    EmptyOrigin,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            cache_startup_data: true,
            log_filter: None,
        }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err_str(ConfigError::Parse)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.origin.trim().is_empty() {
            return Err(ConfigError::EmptyOrigin);
        }

        Ok(())
    }
}

mod ffi {
    use super::*;

    #[uniffi::export]
    fn default_bridge_config() -> BridgeConfig {
        BridgeConfig::default()
    }

    #[uniffi::export]
    fn bridge_config_from_json(json: String) -> Result<BridgeConfig, ConfigError> {
        BridgeConfig::from_json(&json)
    }
}
