use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::UNKNOWN_LABEL;
use crate::similarity::{SimilarityMode, cosine_similarity, dot, normalize};
use crate::store::{FeatureSource, ReferenceSet, ReferenceStore};

use super::error::{ClassifyError, ClassifyResult};
use super::policy::DecisionPolicy;
use super::types::{ClassBest, ConfidenceTier, SimilarityResult, Verdict};

/// Inbound compare request, as posted by the recognition front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareRequest {
    /// Label the caller expects; only used to compute `matched`.
    #[serde(
        default,
        rename = "spotName",
        alias = "spot_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub spot_name: Option<String>,
    pub vector: Vec<f32>,
}

impl CompareRequest {
    pub fn new(spot_name: Option<String>, vector: Vec<f32>) -> Self {
        Self { spot_name, vector }
    }
}

pub struct Classifier<S> {
    store: Arc<ReferenceStore<S>>,
    policy: DecisionPolicy,
    mode: SimilarityMode,
}

impl<S> std::fmt::Debug for Classifier<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("policy", &self.policy)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<S> Clone for Classifier<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy,
            mode: self.mode,
        }
    }
}

impl<S: FeatureSource> Classifier<S> {
    pub fn new(store: Arc<ReferenceStore<S>>, policy: DecisionPolicy) -> Self {
        Self {
            store,
            policy,
            mode: SimilarityMode::default(),
        }
    }

    pub fn with_similarity_mode(mut self, mode: SimilarityMode) -> Self {
        self.mode = mode;
        self
    }

    /// Same store, different policy. Useful for comparing policies side by side.
    pub fn with_policy(&self, policy: DecisionPolicy) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy,
            mode: self.mode,
        }
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    pub fn similarity_mode(&self) -> SimilarityMode {
        self.mode
    }

    pub fn store(&self) -> &Arc<ReferenceStore<S>> {
        &self.store
    }

    pub fn classify_request(&self, request: &CompareRequest) -> ClassifyResult<Verdict> {
        self.classify(request.spot_name.as_deref(), &request.vector)
    }

    /// Classifies `query` against every reference entry.
    ///
    /// `label_hint` only affects [`Verdict::matched`].
    pub fn classify(&self, label_hint: Option<&str>, query: &[f32]) -> ClassifyResult<Verdict> {
        let set = self.store.ensure_loaded()?;

        let ranked = self.rank_against(&set, query)?;

        let Some(top1) = ranked.first() else {
            debug!("Reference set is empty; reporting unknown");
            return Ok(Verdict {
                predicted: UNKNOWN_LABEL.to_string(),
                score: 0.0,
                matched: false,
                reason: "no reference vectors available".to_string(),
                tier: ConfidenceTier::NoReferences,
            });
        };

        let classes = aggregate_by_label(&ranked);
        let decision = self.policy.decide(top1, &classes);

        let predicted = decision
            .label
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
        let matched = label_hint.is_some_and(|hint| hint == predicted);

        debug!(
            policy = %self.policy,
            top_label = %top1.label,
            top_score = top1.score,
            classes = classes.len(),
            predicted = %predicted,
            tier = %decision.tier,
            matched,
            "Classified query"
        );

        Ok(Verdict {
            predicted,
            score: top1.score,
            matched,
            reason: decision.reason,
            tier: decision.tier,
        })
    }

    /// Scores `query` against every reference, best first.
    pub fn rank(&self, query: &[f32]) -> ClassifyResult<Vec<SimilarityResult>> {
        let set = self.store.ensure_loaded()?;
        self.rank_against(&set, query)
    }

    fn rank_against(
        &self,
        set: &ReferenceSet,
        query: &[f32],
    ) -> ClassifyResult<Vec<SimilarityResult>> {
        let Some(expected) = set.dimension() else {
            return Ok(Vec::new());
        };
        if query.len() != expected {
            return Err(ClassifyError::DimensionMismatch {
                expected,
                actual: query.len(),
            });
        }

        let mut ranked: Vec<SimilarityResult> = match self.mode {
            SimilarityMode::Cosine => set
                .entries()
                .iter()
                .map(|e| SimilarityResult::new(e.label.as_str(), cosine_similarity(query, &e.vector)))
                .collect(),
            SimilarityMode::NormalizedDot => {
                let q = normalize(query);
                set.entries()
                    .iter()
                    .zip(set.normalized())
                    .map(|(e, n)| SimilarityResult::new(e.label.as_str(), dot(&q, n)))
                    .collect()
            }
        };

        sort_descending(&mut ranked, |r| r.score);
        Ok(ranked)
    }
}

/// Keeps the best score per label, sorted descending.
pub fn aggregate_by_label(ranked: &[SimilarityResult]) -> Vec<ClassBest> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut classes: Vec<ClassBest> = Vec::new();

    for result in ranked {
        match index.get(result.label.as_str()) {
            Some(&i) => {
                if result.score > classes[i].score {
                    classes[i].score = result.score;
                }
            }
            None => {
                index.insert(result.label.as_str(), classes.len());
                classes.push(ClassBest::new(result.label.as_str(), result.score));
            }
        }
    }

    sort_descending(&mut classes, |c| c.score);
    classes
}

fn sort_descending<T>(items: &mut [T], score: impl Fn(&T) -> f32) {
    items.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal));
}
