use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The reference store could not be loaded.
    #[error("reference store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Query length differs from the reference dimension.
    #[error("query dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type ClassifyResult<T> = Result<T, ClassifyError>;
