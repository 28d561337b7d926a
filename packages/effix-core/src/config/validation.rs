//! Configuration validation
//!
//! Range checks for every tunable. Cross-section consistency (a `z3`
//! backend requested in a build without the feature) is checked by
//! [`EffixConfig`]'s own `validate`.

use super::error::{ConfigError, ConfigResult};
use super::{ClusterConfig, EffixConfig, OracleBackend, OracleConfig, RewardConfig};

/// Trait for validatable configuration objects
pub trait Validatable {
    /// Validate the configuration
    ///
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

fn check_range<T>(field: &str, value: T, min: T, max: T, hint: &str) -> ConfigResult<()>
where
    T: PartialOrd + ToString + Copy,
{
    if value < min || value > max {
        return Err(ConfigError::range_with_hint(field, value, min, max, hint));
    }
    Ok(())
}

impl Validatable for OracleConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "oracle.timeout_ms",
            self.timeout_ms,
            1,
            600_000,
            "A zero timeout makes every query unknown",
        )?;
        check_range(
            "oracle.max_branches",
            self.max_branches,
            1,
            1_000_000,
            "Branch budget bounds the case splits of one query",
        )?;
        check_range(
            "oracle.max_constraints",
            self.max_constraints,
            16,
            1_000_000,
            "Constraint budget bounds Fourier-Motzkin growth",
        )?;
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "OracleConfig"
    }
}

impl Validatable for RewardConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "reward.big_factor",
            self.big_factor,
            0.0,
            1.0,
            "Adjustment factors are fractions of the current weight",
        )?;
        check_range(
            "reward.small_factor",
            self.small_factor,
            0.0,
            1.0,
            "Adjustment factors are fractions of the current weight",
        )?;
        if self.small_factor > self.big_factor {
            return Err(ConfigError::Validation(format!(
                "reward.small_factor ({}) must not exceed reward.big_factor ({})",
                self.small_factor, self.big_factor
            )));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "RewardConfig"
    }
}

impl Validatable for ClusterConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.name_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "clusters.name_prefix must not be empty".to_string(),
            ));
        }
        if self.name_prefix.contains(std::path::MAIN_SEPARATOR) {
            return Err(ConfigError::Validation(format!(
                "clusters.name_prefix '{}' must not contain a path separator",
                self.name_prefix
            )));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "ClusterConfig"
    }
}

impl Validatable for EffixConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.oracle.validate()?;
        self.reward.validate()?;
        self.clusters.validate()?;

        if self.oracle.backend == OracleBackend::Z3 && !cfg!(feature = "z3") {
            return Err(ConfigError::BackendUnavailable("z3".to_string()));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "EffixConfig"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EffixConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = OracleConfig::default();
        config.timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Range { .. }));
    }

    #[test]
    fn test_inverted_reward_factors_rejected() {
        let config = RewardConfig {
            big_factor: 0.05,
            small_factor: 0.1,
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let config = ClusterConfig {
            name_prefix: String::new(),
        };
        assert!(config.validate().is_err());
    }

    #[cfg(not(feature = "z3"))]
    #[test]
    fn test_z3_backend_requires_feature() {
        let mut config = EffixConfig::default();
        config.oracle.backend = OracleBackend::Z3;
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::BackendUnavailable(_)
        ));
    }
}
