//! Spotmatch library crate (used by the CLI and integration tests).
//!
//! Classifies a query feature vector against a persisted catalogue of
//! `(label, vector)` references and explains the decision.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Environment configuration
//! - [`Classifier`], [`Verdict`], [`ConfidenceTier`] - Classification
//! - [`DecisionPolicy`] - Selectable decision strategy
//!
//! ## Reference Store
//! - [`ReferenceStore`], [`ReferenceSet`], [`ReferenceEntry`] - Load-once reference data
//! - [`FeatureSource`], [`SqliteFeatureSource`] - Where references come from
//!
//! ## Similarity
//! - [`cosine_similarity`], [`SimilarityMode`] - Scoring primitives
//!
//! ## Test/Mock Support
//! [`MockFeatureSource`] is available behind `#[cfg(any(test, feature = "mock"))]`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use spotmatch::{Classifier, Config, ReferenceStore, SqliteFeatureSource};
//!
//! let config = Config::from_env()?;
//! let store = Arc::new(ReferenceStore::new(SqliteFeatureSource::new(
//!     config.feature_db_path.clone(),
//! )));
//! let classifier = Classifier::new(store, config.policy)
//!     .with_similarity_mode(config.similarity_mode);
//!
//! let verdict = classifier.classify(Some("lighthouse"), &[0.1, 0.7, 0.2])?;
//! println!("{verdict}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classifier;
pub mod config;
pub mod constants;
pub mod similarity;
pub mod store;

pub use classifier::{
    ClassBest, Classifier, ClassifyError, ClassifyResult, CompareRequest, ConfidenceTier,
    Decision, DecisionPolicy, DualThreshold, PolicyParseError, RatioThreshold, SimilarityResult,
    Verdict, aggregate_by_label,
};
pub use config::{Config, ConfigError};
pub use constants::{NORM_EPSILON, UNKNOWN_LABEL};
pub use similarity::{
    SimilarityMode, SimilarityModeParseError, cosine_similarity, dot, l2_norm, l2_normalize,
    normalize,
};
#[cfg(any(test, feature = "mock"))]
pub use store::MockFeatureSource;
pub use store::{
    FeatureRow, FeatureSource, ReferenceEntry, ReferenceSet, ReferenceStore, SqliteFeatureSource,
    StoreError, StoreResult, decode_feature, encode_feature,
};
