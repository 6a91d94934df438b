use tracing::debug;

use crate::constants::{F32_BYTES, NORM_EPSILON};
use crate::similarity::l2_normalize;

use super::error::{StoreError, StoreResult};
use super::source::FeatureRow;

/// One stored `(label, vector)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    pub label: String,
    pub vector: Vec<f32>,
}

impl ReferenceEntry {
    pub fn new(label: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            label: label.into(),
            vector,
        }
    }
}

/// A fully loaded reference table.
///
/// Holds every entry plus an L2-normalized copy of each vector, index-aligned
/// with `entries`. All vectors share one dimension.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    entries: Vec<ReferenceEntry>,
    normalized: Vec<Vec<f32>>,
    dimension: Option<usize>,
}

impl ReferenceSet {
    /// Builds a set from decoded entries, rejecting ragged dimensions.
    pub fn new(entries: Vec<ReferenceEntry>) -> StoreResult<Self> {
        let mut dimension = None;

        for entry in &entries {
            if entry.vector.is_empty() {
                return Err(StoreError::InvalidFeatureBytes {
                    label: entry.label.clone(),
                    len: 0,
                });
            }
            match dimension {
                None => dimension = Some(entry.vector.len()),
                Some(expected) if expected != entry.vector.len() => {
                    return Err(StoreError::DimensionMismatch {
                        label: entry.label.clone(),
                        expected,
                        actual: entry.vector.len(),
                    });
                }
                Some(_) => {}
            }
        }

        let normalized = entries
            .iter()
            .map(|e| l2_normalize(&e.vector, NORM_EPSILON))
            .collect();

        debug!(
            entries = entries.len(),
            dimension = dimension.unwrap_or(0),
            "Built reference set"
        );

        Ok(Self {
            entries,
            normalized,
            dimension,
        })
    }

    /// Decodes raw rows and builds the set.
    pub fn from_rows(rows: Vec<FeatureRow>) -> StoreResult<Self> {
        let entries = rows
            .into_iter()
            .map(|row| {
                let vector = decode_feature(&row.label, &row.feature)?;
                Ok(ReferenceEntry::new(row.label, vector))
            })
            .collect::<StoreResult<Vec<_>>>()?;

        Self::new(entries)
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Normalized vectors, index-aligned with [`entries`](Self::entries).
    pub fn normalized(&self) -> &[Vec<f32>] {
        &self.normalized
    }

    /// Shared vector dimension, `None` when the set is empty.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct labels in first-seen order.
    pub fn labels(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.label.as_str()) {
                seen.push(entry.label.as_str());
            }
        }
        seen
    }
}

/// Decodes a raw feature blob into `f32` values (native byte order).
pub fn decode_feature(label: &str, bytes: &[u8]) -> StoreResult<Vec<f32>> {
    if bytes.is_empty() || !bytes.len().is_multiple_of(F32_BYTES) {
        return Err(StoreError::InvalidFeatureBytes {
            label: label.to_string(),
            len: bytes.len(),
        });
    }
    // Blobs coming out of SQLite carry no alignment guarantee, so copy.
    Ok(bytemuck::allocation::pod_collect_to_vec(bytes))
}

/// Encodes `f32` values into the blob layout read by [`decode_feature`].
pub fn encode_feature(vector: &[f32]) -> Vec<u8> {
    bytemuck::cast_slice(vector).to_vec()
}
