//! Reward domain models

pub mod bug;

pub use bug::{BugDescriptor, BugType};

use crate::config::RewardConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Strength of one reward axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardLevel {
    #[default]
    None,
    Small,
    Big,
}

impl RewardLevel {
    /// Weight adjustment handed to the patch-grammar learner
    pub fn adjustment_factor(&self, config: &RewardConfig) -> f64 {
        match self {
            RewardLevel::None => 0.0,
            RewardLevel::Small => config.small_factor,
            RewardLevel::Big => config.big_factor,
        }
    }
}

impl fmt::Display for RewardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RewardLevel::None => "none",
            RewardLevel::Small => "small",
            RewardLevel::Big => "big",
        };
        write!(f, "{}", text)
    }
}

/// Reward of one cluster relative to the baseline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardVerdict {
    /// Elimination progress
    pub pe: RewardLevel,
    /// Path-independent improvement
    pub ppie: RewardLevel,
    pub locally_good: bool,
}

impl RewardVerdict {
    pub fn new(pe: RewardLevel, ppie: RewardLevel) -> Self {
        Self {
            pe,
            ppie,
            locally_good: pe != RewardLevel::None && ppie == RewardLevel::Big,
        }
    }
}

impl fmt::Display for RewardVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let goodness = if self.locally_good { "GOOD" } else { "BAD" };
        write!(f, "{}, pe_incre: {}, ppie_incre: {}", goodness, self.pe, self.ppie)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    /// The baseline has no disjunct exhibiting the target bug
    #[error("No disjunct of the original signature shows bug {bug}")]
    BuggyDisjunctNotFound { bug: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locally_good() {
        assert!(RewardVerdict::new(RewardLevel::Small, RewardLevel::Big).locally_good);
        assert!(!RewardVerdict::new(RewardLevel::None, RewardLevel::Big).locally_good);
        assert!(!RewardVerdict::new(RewardLevel::Big, RewardLevel::Small).locally_good);
    }

    #[test]
    fn test_adjustment_factor() {
        let config = RewardConfig::default();
        assert_eq!(RewardLevel::Big.adjustment_factor(&config), 0.2);
        assert_eq!(RewardLevel::Small.adjustment_factor(&config), 0.1);
        assert_eq!(RewardLevel::None.adjustment_factor(&config), 0.0);
    }
}
