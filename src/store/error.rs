use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the reference feature table.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persisted source does not exist.
    #[error("feature database not found: {path}")]
    NotFound { path: PathBuf },

    /// The persisted source exists but holds no reference rows.
    #[error("feature database has no reference rows: {path}")]
    Empty { path: PathBuf },

    /// A feature payload is empty or not a whole number of `f32` values.
    #[error("invalid feature payload for label '{label}': {len} bytes")]
    InvalidFeatureBytes { label: String, len: usize },

    /// A row decodes to a different dimension than the rest of the table.
    #[error("dimension mismatch for label '{label}': expected {expected}, got {actual}")]
    DimensionMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failure reported by a non-SQLite [`FeatureSource`](super::FeatureSource).
    #[error("feature source failed: {0}")]
    SourceFailed(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
