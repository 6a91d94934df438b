//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Decision policy name is not recognized.
    #[error("invalid decision policy: {0}")]
    InvalidPolicy(#[from] crate::classifier::PolicyParseError),

    /// Similarity mode name is not recognized.
    #[error("invalid similarity mode: {0}")]
    InvalidSimilarityMode(#[from] crate::similarity::SimilarityModeParseError),

    /// A threshold could not be parsed or is out of range.
    #[error("invalid threshold {name}='{value}'")]
    InvalidThreshold { name: &'static str, value: String },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
