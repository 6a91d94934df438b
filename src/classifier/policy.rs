//! Decision policies applied to ranked similarity scores.
//!
//! Both variants consume the same inputs (the top-1 reference match and the
//! per-label best scores, sorted descending) and produce a [`Decision`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{
    DEFAULT_ABSOLUTE_THRESHOLD, DEFAULT_GAP_THRESHOLD, DEFAULT_HIGH_THRESHOLD,
    DEFAULT_LOW_THRESHOLD, DEFAULT_RATIO_EPSILON, DEFAULT_RATIO_THRESHOLD, REASON_PRECISION,
};

use super::types::{ClassBest, ConfidenceTier, Decision, SimilarityResult};

pub const ABSOLUTE_DUAL_THRESHOLD_NAME: &str = "absolute-dual-threshold";
pub const RATIO_AND_ABSOLUTE_NAME: &str = "ratio-and-absolute";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown decision policy '{value}' (expected 'absolute-dual-threshold' or 'ratio-and-absolute')"
)]
pub struct PolicyParseError {
    pub value: String,
}

/// Thresholds for [`DecisionPolicy::AbsoluteDualThreshold`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualThreshold {
    /// Top-1 score strictly above this is accepted.
    pub high: f32,
    /// Top-1 score strictly below this is rejected.
    pub low: f32,
    /// In between, the best class must lead the second by more than this.
    pub gap: f32,
}

impl Default for DualThreshold {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_THRESHOLD,
            low: DEFAULT_LOW_THRESHOLD,
            gap: DEFAULT_GAP_THRESHOLD,
        }
    }
}

/// Thresholds for [`DecisionPolicy::RatioAndAbsolute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioThreshold {
    /// `best / second` must exceed this.
    pub ratio: f32,
    /// `best` must exceed this.
    pub absolute: f32,
    /// A second score at or below this passes the ratio check outright.
    pub epsilon: f32,
}

impl Default for RatioThreshold {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_RATIO_THRESHOLD,
            absolute: DEFAULT_ABSOLUTE_THRESHOLD,
            epsilon: DEFAULT_RATIO_EPSILON,
        }
    }
}

/// Strategy that turns ranked scores into a [`Decision`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecisionPolicy {
    /// Accept/reject on the top-1 score, with a class-gap check in the medium band.
    AbsoluteDualThreshold(DualThreshold),
    /// Accept only if the best class clears both a ratio and an absolute bar.
    RatioAndAbsolute(RatioThreshold),
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        DecisionPolicy::AbsoluteDualThreshold(DualThreshold::default())
    }
}

impl DecisionPolicy {
    pub fn absolute_dual_threshold() -> Self {
        DecisionPolicy::AbsoluteDualThreshold(DualThreshold::default())
    }

    pub fn ratio_and_absolute() -> Self {
        DecisionPolicy::RatioAndAbsolute(RatioThreshold::default())
    }

    /// Stable configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            DecisionPolicy::AbsoluteDualThreshold(_) => ABSOLUTE_DUAL_THRESHOLD_NAME,
            DecisionPolicy::RatioAndAbsolute(_) => RATIO_AND_ABSOLUTE_NAME,
        }
    }

    /// Applies the policy.
    ///
    /// `classes` must be sorted by descending score and contain `top1.label`.
    pub fn decide(&self, top1: &SimilarityResult, classes: &[ClassBest]) -> Decision {
        let Some(best) = classes.first() else {
            return Decision::reject(
                ConfidenceTier::NoReferences,
                "no reference vectors available".to_string(),
            );
        };
        let second = classes.get(1);

        match self {
            DecisionPolicy::AbsoluteDualThreshold(t) => decide_dual(t, top1, best, second),
            DecisionPolicy::RatioAndAbsolute(t) => decide_ratio(t, best, second),
        }
    }
}

impl fmt::Display for DecisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DecisionPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            ABSOLUTE_DUAL_THRESHOLD_NAME => Ok(Self::absolute_dual_threshold()),
            RATIO_AND_ABSOLUTE_NAME => Ok(Self::ratio_and_absolute()),
            _ => Err(PolicyParseError {
                value: s.to_string(),
            }),
        }
    }
}

fn decide_dual(
    t: &DualThreshold,
    top1: &SimilarityResult,
    best: &ClassBest,
    second: Option<&ClassBest>,
) -> Decision {
    const P: usize = REASON_PRECISION;

    if top1.score > t.high {
        return Decision::accept(
            top1.label.clone(),
            ConfidenceTier::High,
            format!("similarity {:.P$} > {}", top1.score, t.high),
        );
    }

    if top1.score < t.low {
        return Decision::reject(
            ConfidenceTier::Low,
            format!("similarity {:.P$} < {}", top1.score, t.low),
        );
    }

    let Some(second) = second else {
        return Decision::accept(
            best.label.clone(),
            ConfidenceTier::MediumAccepted,
            "single matching class".to_string(),
        );
    };

    let gap = best.score - second.score;
    let detail = format!(
        "(best: {}={:.P$}, second: {}={:.P$})",
        best.label, best.score, second.label, second.score
    );

    if gap > t.gap {
        Decision::accept(
            best.label.clone(),
            ConfidenceTier::MediumAccepted,
            format!("class gap {:.P$} > {} {}", gap, t.gap, detail),
        )
    } else {
        Decision::reject(
            ConfidenceTier::MediumRejected,
            format!("class gap {:.P$} <= {} {}", gap, t.gap, detail),
        )
    }
}

fn decide_ratio(t: &RatioThreshold, best: &ClassBest, second: Option<&ClassBest>) -> Decision {
    const P: usize = REASON_PRECISION;

    let second_score = second.map_or(0.0, |c| c.score);

    let (ratio_ok, ratio_text) = if second_score <= t.epsilon {
        (true, format!("ratio n/a (second {:.P$} <= {:e})", second_score, t.epsilon))
    } else {
        let ratio = best.score / second_score;
        let ok = ratio > t.ratio;
        let op = if ok { ">" } else { "<=" };
        (ok, format!("ratio {:.P$} {} {}", ratio, op, t.ratio))
    };

    let abs_ok = best.score > t.absolute;
    let abs_op = if abs_ok { ">" } else { "<=" };

    let second_text = match second {
        Some(c) => format!("{}={:.P$}", c.label, c.score),
        None => "none".to_string(),
    };

    let reason = format!(
        "{} {}, best {:.P$} {} {} {} (best: {}={:.P$}, second: {})",
        ratio_text,
        pass_fail(ratio_ok),
        best.score,
        abs_op,
        t.absolute,
        pass_fail(abs_ok),
        best.label,
        best.score,
        second_text
    );

    if ratio_ok && abs_ok {
        Decision::accept(best.label.clone(), ConfidenceTier::RatioAccepted, reason)
    } else {
        Decision::reject(ConfidenceTier::RatioRejected, reason)
    }
}

fn pass_fail(ok: bool) -> &'static str {
    if ok { "passed" } else { "failed" }
}
