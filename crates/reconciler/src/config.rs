//! Reconciler configuration loaded from a TOML file

use std::fs;

use serde::{Deserialize, Serialize};
use voltmesh_gateway::ProviderConfig;

use crate::error::ConfigError;

/// Service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReconcilerConfig {
    /// Wallet provider bridge transport settings.
    pub provider: ProviderConfig,

    /// Reconciliation poll interval in seconds.
    pub poll_interval_secs: u64,

    /// Telemetry record feed settings.
    pub telemetry: TelemetryConfig,
}

/// Configuration for the external telemetry record feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    pub enabled: bool,

    /// Read-only JSON endpoint serving device records.
    pub url: String,

    /// Poll interval in seconds.
    pub poll_interval_secs: u64,
}

impl ReconcilerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let config: ReconcilerConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Write {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.endpoint.is_empty() {
            return Err(ConfigError::invalid("provider.endpoint", "must not be empty"));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::invalid("provider.timeout_secs", "must be greater than 0"));
        }

        if self.poll_interval_secs == 0 {
            return Err(ConfigError::invalid("poll_interval_secs", "must be greater than 0"));
        }

        if self.telemetry.enabled {
            if self.telemetry.url.is_empty() {
                return Err(ConfigError::invalid("telemetry.url", "must not be empty when enabled"));
            }
            if self.telemetry.poll_interval_secs == 0 {
                return Err(ConfigError::invalid(
                    "telemetry.poll_interval_secs",
                    "must be greater than 0",
                ));
            }
        }

        Ok(())
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                endpoint: "http://127.0.0.1:8545".to_string(),
                timeout_secs: 30,
            },
            poll_interval_secs: 15,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            poll_interval_secs: 5,
        }
    }
}

/// Create an example configuration file.
pub fn create_example_config(path: &str) -> Result<(), ConfigError> {
    let example = ReconcilerConfig {
        provider: ProviderConfig {
            endpoint: "http://127.0.0.1:8545".to_string(),
            timeout_secs: 30,
        },
        poll_interval_secs: 15,
        telemetry: TelemetryConfig {
            enabled: true,
            url: "https://telemetry.example/records".to_string(),
            poll_interval_secs: 5,
        },
    };
    example.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ReconcilerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = ReconcilerConfig::default();
        config.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enabled_telemetry_requires_url() {
        let mut config = ReconcilerConfig::default();
        config.telemetry.enabled = true;
        config.telemetry.url = String::new();
        assert!(config.validate().is_err());

        config.telemetry.url = "https://telemetry.example/records".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ReconcilerConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: ReconcilerConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.poll_interval_secs, config.poll_interval_secs);
        assert_eq!(parsed.provider.endpoint, config.provider.endpoint);
    }
}
