//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SPOTMATCH_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::classifier::{DecisionPolicy, DualThreshold, RatioThreshold};
use crate::constants::DEFAULT_FEATURE_DB_PATH;
use crate::similarity::SimilarityMode;

/// Classifier configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SPOTMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite file holding the `features` table. Default: `/app/data/train_features.db`.
    pub feature_db_path: PathBuf,

    /// Decision policy, with its thresholds. Default: absolute dual threshold.
    pub policy: DecisionPolicy,

    /// How queries are scored against references. Default: `cosine`.
    pub similarity_mode: SimilarityMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feature_db_path: PathBuf::from(DEFAULT_FEATURE_DB_PATH),
            policy: DecisionPolicy::default(),
            similarity_mode: SimilarityMode::default(),
        }
    }
}

impl Config {
    const ENV_FEATURE_DB_PATH: &'static str = "SPOTMATCH_FEATURE_DB_PATH";
    const ENV_FEATURE_DB_PATH_LEGACY: &'static str = "FEATURE_DB_PATH";
    const ENV_POLICY: &'static str = "SPOTMATCH_POLICY";
    const ENV_SIMILARITY: &'static str = "SPOTMATCH_SIMILARITY";
    const ENV_HIGH_THRESHOLD: &'static str = "SPOTMATCH_HIGH_THRESHOLD";
    const ENV_LOW_THRESHOLD: &'static str = "SPOTMATCH_LOW_THRESHOLD";
    const ENV_GAP_THRESHOLD: &'static str = "SPOTMATCH_GAP_THRESHOLD";
    const ENV_RATIO_THRESHOLD: &'static str = "SPOTMATCH_RATIO_THRESHOLD";
    const ENV_ABSOLUTE_THRESHOLD: &'static str = "SPOTMATCH_ABSOLUTE_THRESHOLD";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Threshold overrides only apply to the selected policy.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let feature_db_path = Self::parse_optional_path_from_env(Self::ENV_FEATURE_DB_PATH)
            .or_else(|| Self::parse_optional_path_from_env(Self::ENV_FEATURE_DB_PATH_LEGACY))
            .unwrap_or(defaults.feature_db_path);

        let policy = match env::var(Self::ENV_POLICY) {
            Ok(value) => value.parse::<DecisionPolicy>()?,
            Err(_) => defaults.policy,
        };
        let policy = Self::apply_threshold_overrides(policy)?;

        let similarity_mode = match env::var(Self::ENV_SIMILARITY) {
            Ok(value) => value.parse::<SimilarityMode>()?,
            Err(_) => defaults.similarity_mode,
        };

        Ok(Self {
            feature_db_path,
            policy,
            similarity_mode,
        })
    }

    /// Validates the database path and threshold ranges (does not open the database).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path = &self.feature_db_path;
        if !path.exists() {
            return Err(ConfigError::PathNotFound { path: path.clone() });
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile { path: path.clone() });
        }

        match self.policy {
            DecisionPolicy::AbsoluteDualThreshold(t) => {
                Self::check_threshold(Self::ENV_HIGH_THRESHOLD, t.high, |v| v.is_finite())?;
                Self::check_threshold(Self::ENV_LOW_THRESHOLD, t.low, |v| {
                    v.is_finite() && v <= t.high
                })?;
                Self::check_threshold(Self::ENV_GAP_THRESHOLD, t.gap, |v| {
                    v.is_finite() && v >= 0.0
                })?;
            }
            DecisionPolicy::RatioAndAbsolute(t) => {
                Self::check_threshold(Self::ENV_RATIO_THRESHOLD, t.ratio, |v| {
                    v.is_finite() && v > 0.0
                })?;
                Self::check_threshold(Self::ENV_ABSOLUTE_THRESHOLD, t.absolute, |v| {
                    v.is_finite()
                })?;
            }
        }

        Ok(())
    }

    fn check_threshold(
        name: &'static str,
        value: f32,
        ok: impl Fn(f32) -> bool,
    ) -> Result<(), ConfigError> {
        if ok(value) {
            Ok(())
        } else {
            Err(ConfigError::InvalidThreshold {
                name,
                value: value.to_string(),
            })
        }
    }

    fn apply_threshold_overrides(policy: DecisionPolicy) -> Result<DecisionPolicy, ConfigError> {
        Ok(match policy {
            DecisionPolicy::AbsoluteDualThreshold(t) => {
                DecisionPolicy::AbsoluteDualThreshold(DualThreshold {
                    high: Self::parse_f32_from_env(Self::ENV_HIGH_THRESHOLD, t.high)?,
                    low: Self::parse_f32_from_env(Self::ENV_LOW_THRESHOLD, t.low)?,
                    gap: Self::parse_f32_from_env(Self::ENV_GAP_THRESHOLD, t.gap)?,
                })
            }
            DecisionPolicy::RatioAndAbsolute(t) => {
                DecisionPolicy::RatioAndAbsolute(RatioThreshold {
                    ratio: Self::parse_f32_from_env(Self::ENV_RATIO_THRESHOLD, t.ratio)?,
                    absolute: Self::parse_f32_from_env(Self::ENV_ABSOLUTE_THRESHOLD, t.absolute)?,
                    ..t
                })
            }
        })
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_f32_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or(ConfigError::InvalidThreshold {
                    name: var_name,
                    value,
                }),
            Err(_) => Ok(default),
        }
    }
}
