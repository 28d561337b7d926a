//! Error types for effix-core
//!
//! Provides unified error handling across the crate. Feature modules keep
//! their own narrow error enums and convert into [`EffixError`] at the
//! feature boundary.

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::clause::domain::ClauseError;
use crate::features::clause::ports::OracleError;
use crate::features::reward::domain::RewardError;

/// Main error type for effix-core operations
#[derive(Debug, Error)]
pub enum EffixError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input (summary or report file)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structurally invalid analyzer output
    #[error("Parse error: {0}")]
    Parse(String),

    /// Clause construction error
    #[error("Clause error: {0}")]
    Clause(#[from] ClauseError),

    /// Decision procedure failure
    #[error("Decision procedure error: {0}")]
    Oracle(#[from] OracleError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reward classification precondition violated
    #[error("Reward error: {0}")]
    Reward(#[from] RewardError),
}

impl EffixError {
    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        EffixError::Parse(msg.into())
    }
}

/// Result type alias for effix operations
pub type Result<T> = std::result::Result<T, EffixError>;
