//! Cross-cutting, shared constants.
//!
//! # Threshold Sets
//!
//! Two threshold families are kept side by side, one per
//! [`DecisionPolicy`](crate::classifier::DecisionPolicy) variant. Neither set is
//! canonical; the policy is selected through configuration.

/// Label reported when no reference passes the decision policy.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Floor applied to vector norms before dividing during normalization.
pub const NORM_EPSILON: f32 = 1e-8;

/// Default location of the reference feature table.
pub const DEFAULT_FEATURE_DB_PATH: &str = "/app/data/train_features.db";

/// Table and columns read from the feature database.
pub const FEATURE_TABLE: &str = "features";

/// Size of one encoded feature component in bytes.
pub const F32_BYTES: usize = std::mem::size_of::<f32>();

/// Number of decimal places used when rendering scores into verdict reasons.
pub const REASON_PRECISION: usize = 4;

// Absolute dual-threshold policy.

/// Top-1 similarity strictly above this is accepted outright.
pub const DEFAULT_HIGH_THRESHOLD: f32 = 0.80;
/// Top-1 similarity strictly below this is rejected outright.
pub const DEFAULT_LOW_THRESHOLD: f32 = 0.70;
/// Minimum best-vs-second class gap required inside the medium band.
pub const DEFAULT_GAP_THRESHOLD: f32 = 0.10;

// Ratio-and-absolute policy.

/// Best/second class score ratio must exceed this.
pub const DEFAULT_RATIO_THRESHOLD: f32 = 1.01;
/// Best class score must exceed this.
pub const DEFAULT_ABSOLUTE_THRESHOLD: f32 = 0.72;
/// Second class scores at or below this skip the ratio check.
pub const DEFAULT_RATIO_EPSILON: f32 = 1e-8;
