//! Nearest-reference classification with tiered decisions.
//!
//! [`Classifier::classify`] scores a query vector against every entry in the
//! [`ReferenceStore`](crate::store::ReferenceStore), keeps the best score per
//! label, and hands both views to the configured [`DecisionPolicy`].
//!
//! # Reported Score
//!
//! [`Verdict::score`] is always the score of the single nearest reference, even
//! when the policy decided on class-level aggregates. The score says how close
//! the nearest neighbour was; the label says what passed the policy.

pub mod engine;
pub mod error;
pub mod policy;
pub mod types;


pub use engine::{Classifier, CompareRequest, aggregate_by_label};
pub use error::{ClassifyError, ClassifyResult};
pub use policy::{DecisionPolicy, DualThreshold, PolicyParseError, RatioThreshold};
pub use types::{ClassBest, ConfidenceTier, Decision, SimilarityResult, Verdict};
