//! Contract configuration

use pharmanet_identity::{MspDirectory, DEFAULT_NETWORK_DOMAIN};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Custody precondition applied when a unit is sold to a consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetailPolicy {
    /// Any existing unit may be retailed by a retailer.
    #[default]
    Unconditional,
    /// The named retailer must currently own the unit.
    RequireRetailerCustody,
}

/// Contract configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Domain organisation names are derived from
    /// (`manufacturer.<network_domain>`).
    pub network_domain: String,

    pub retail_policy: RetailPolicy,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            network_domain: DEFAULT_NETWORK_DOMAIN.to_string(),
            retail_policy: RetailPolicy::default(),
        }
    }
}

impl ContractConfig {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ContractConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.network_domain.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "network_domain must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load configuration from file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn directory(&self) -> MspDirectory {
        MspDirectory::new(self.network_domain.trim())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
