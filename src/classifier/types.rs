use serde::{Deserialize, Serialize};

/// Score of the query against one reference entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    pub label: String,
    pub score: f32,
}

impl SimilarityResult {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Best score observed for one distinct label.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBest {
    pub label: String,
    pub score: f32,
}

impl ClassBest {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Qualitative band that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Top match above the high threshold.
    High,
    /// Medium band, class gap large enough (or only one class).
    MediumAccepted,
    /// Medium band, classes too close to call.
    MediumRejected,
    /// Top match below the low threshold.
    Low,
    /// Ratio and absolute checks both passed.
    RatioAccepted,
    /// Ratio or absolute check failed.
    RatioRejected,
    /// The reference set was empty.
    NoReferences,
}

impl ConfidenceTier {
    /// Returns `true` for tiers that report a real label.
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            ConfidenceTier::High | ConfidenceTier::MediumAccepted | ConfidenceTier::RatioAccepted
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::MediumAccepted => "medium_accepted",
            ConfidenceTier::MediumRejected => "medium_rejected",
            ConfidenceTier::Low => "low",
            ConfidenceTier::RatioAccepted => "ratio_accepted",
            ConfidenceTier::RatioRejected => "ratio_rejected",
            ConfidenceTier::NoReferences => "no_references",
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a [`DecisionPolicy`](super::DecisionPolicy), before the hint is compared.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Accepted label, or `None` for unknown.
    pub label: Option<String>,
    pub tier: ConfidenceTier,
    pub reason: String,
}

impl Decision {
    pub fn accept(label: impl Into<String>, tier: ConfidenceTier, reason: String) -> Self {
        Self {
            label: Some(label.into()),
            tier,
            reason,
        }
    }

    pub fn reject(tier: ConfidenceTier, reason: String) -> Self {
        Self {
            label: None,
            tier,
            reason,
        }
    }
}

/// Result returned to the caller of [`Classifier::classify`](super::Classifier::classify).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Predicted label, or [`UNKNOWN_LABEL`](crate::constants::UNKNOWN_LABEL).
    pub predicted: String,
    /// Score of the single nearest reference, whatever branch decided.
    pub score: f32,
    /// `true` only when a hint was supplied and equals `predicted`.
    pub matched: bool,
    pub reason: String,
    pub tier: ConfidenceTier,
}

impl Verdict {
    /// Returns `true` if `predicted` is a real label.
    pub fn is_known(&self) -> bool {
        self.tier.is_accepted()
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, score: {:.4}): {}",
            self.predicted, self.tier, self.score, self.reason
        )
    }
}
