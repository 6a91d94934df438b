//! Vector similarity primitives.
//!
//! Cosine similarity is the only metric. [`SimilarityMode`] decides whether it is
//! computed in full per comparison or as a dot product over vectors that were
//! normalized ahead of time; both give the same value within float tolerance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::NORM_EPSILON;

/// How the classifier scores a query against the reference set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityMode {
    /// `dot(a, b) / (‖a‖·‖b‖)` against the raw reference vectors.
    #[default]
    Cosine,
    /// Normalize the query once, then dot it against the pre-normalized references.
    NormalizedDot,
}

impl SimilarityMode {
    /// Stable configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMode::Cosine => "cosine",
            SimilarityMode::NormalizedDot => "normalized-dot",
        }
    }
}

impl fmt::Display for SimilarityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown similarity mode '{value}' (expected 'cosine' or 'normalized-dot')")]
pub struct SimilarityModeParseError {
    pub value: String,
}

impl FromStr for SimilarityMode {
    type Err = SimilarityModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "cosine" => Ok(SimilarityMode::Cosine),
            "normalized-dot" => Ok(SimilarityMode::NormalizedDot),
            _ => Err(SimilarityModeParseError {
                value: s.to_string(),
            }),
        }
    }
}

// Sums run in f64: squares of large f32 components overflow f32.

/// Dot product. Returns `0.0` for mismatched lengths.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum::<f64>() as f32
}

fn norm_f64(v: &[f32]) -> f64 {
    v.iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

/// Euclidean (L2) norm.
#[inline]
pub fn l2_norm(v: &[f32]) -> f32 {
    norm_f64(v) as f32
}

/// Returns `v / max(‖v‖, eps)`.
///
/// An all-zero vector stays all-zero, so it scores `0.0` against anything.
pub fn l2_normalize(v: &[f32], eps: f32) -> Vec<f32> {
    let norm = norm_f64(v).max(f64::from(eps));
    v.iter().map(|&x| (f64::from(x) / norm) as f32).collect()
}

/// [`l2_normalize`] with the crate-wide [`NORM_EPSILON`].
pub fn normalize(v: &[f32]) -> Vec<f32> {
    l2_normalize(v, NORM_EPSILON)
}

/// Cosine similarity: `dot(a, b) / (‖a‖·‖b‖)`.
///
/// Returns `0.0` if either norm is zero, or if the inputs are empty or differ in
/// length. Callers are expected to validate dimensions before scoring.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) = a.iter().zip(b.iter()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&av, &bv)| {
            let (av, bv) = (f64::from(av), f64::from(bv));
            (dot + av * bv, na + av * av, nb + bv * bv)
        },
    );

    let denom = norm_a_sq.sqrt() * norm_b_sq.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        (dot / denom) as f32
    }
}
