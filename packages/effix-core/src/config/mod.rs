//! Configuration
//!
//! Three sections, all optional in the YAML file:
//! - `oracle`: which decision procedure answers equivalence/implication
//!   queries, how long one query may run, and what an inconclusive answer
//!   means for merging and matching.
//! - `reward`: adjustment factors handed to the patch-grammar learner.
//! - `clusters`: naming of the clusters a manager creates.
//!
//! ```rust,ignore
//! use effix_core::config::EffixConfig;
//!
//! let config = EffixConfig::from_yaml("effix.yaml")?;
//! let oracle = FormulaOracle::from_config(&config.oracle)?;
//! ```

pub mod error;
pub mod io;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, SUPPORTED_VERSIONS};
pub use validation::Validatable;

use serde::{Deserialize, Serialize};

/// Decision procedure implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleBackend {
    /// Built-in linear-arithmetic procedure (always available)
    Lightweight,
    /// Z3 (requires the `z3` cargo feature)
    Z3,
}

/// How an inconclusive (timeout / budget exhausted) query is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// The property was not proven: formulas are treated as not equivalent,
    /// implications as not holding
    NotEquivalent,
    /// Surface the inconclusive answer as a hard error
    Error,
}

/// Decision procedure settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleConfig {
    pub backend: OracleBackend,
    /// Per-query time budget
    pub timeout_ms: u64,
    pub unknown_policy: UnknownPolicy,
    /// Case-split budget per query (lightweight backend)
    pub max_branches: usize,
    /// Constraint-set size budget during elimination (lightweight backend)
    pub max_constraints: usize,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            backend: OracleBackend::Lightweight,
            timeout_ms: 5000,
            unknown_policy: UnknownPolicy::NotEquivalent,
            max_branches: 4096,
            max_constraints: 2048,
        }
    }
}

/// Weight adjustments consumed by the patch-grammar learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewardConfig {
    pub big_factor: f64,
    pub small_factor: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            big_factor: 0.2,
            small_factor: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterConfig {
    /// Clusters are named `cluster-<name_prefix>-<index>`
    pub name_prefix: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name_prefix: "fix".to_string(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffixConfig {
    pub oracle: OracleConfig,
    pub reward: RewardConfig,
    pub clusters: ClusterConfig,
}
