//! Configuration I/O (YAML loading)
//!
//! Schema v1:
//!
//! ```yaml
//! version: 1
//! oracle:
//!   backend: lightweight      # or z3
//!   timeout_ms: 5000
//!   unknown_policy: not_equivalent
//! reward:
//!   big_factor: 0.2
//!   small_factor: 0.1
//! clusters:
//!   name_prefix: fix
//! ```

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;
use super::{ClusterConfig, EffixConfig, OracleConfig, RewardConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema versions this build understands
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: u32,

    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub reward: RewardConfig,

    #[serde(default)]
    pub clusters: ClusterConfig,
}

impl EffixConfig {
    /// Load and validate a configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        let version = raw
            .get("version")
            .ok_or(ConfigError::MissingVersion)?
            .as_u64()
            .ok_or_else(|| ConfigError::Validation("'version' must be an integer".to_string()))?;

        if !SUPPORTED_VERSIONS.contains(&(version as u32)) {
            return Err(ConfigError::UnsupportedVersion {
                found: version as u32,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let file: ConfigFileV1 = serde_yaml::from_value(raw)?;
        let config = EffixConfig {
            oracle: file.oracle,
            reward: file.reward,
            clusters: file.clusters,
        };
        config.validate()?;

        tracing::debug!(
            "Loaded configuration (backend={:?}, unknown_policy={:?})",
            config.oracle.backend,
            config.oracle.unknown_policy
        );
        Ok(config)
    }

    /// Serialize as a v1 YAML document
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: 1,
            oracle: self.oracle.clone(),
            reward: self.reward.clone(),
            clusters: self.clusters.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}
