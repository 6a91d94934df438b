//! Command-line arguments.

use std::path::{Path, PathBuf};

use clap::Parser;

/// Classify a feature vector against the reference table.
///
/// Configuration comes from `SPOTMATCH_*` environment variables. Logs go to
/// stderr (filter with `RUST_LOG`); stdout carries JSON only.
#[derive(Debug, Parser)]
#[command(name = "spotmatch", version, about, long_about = None)]
pub struct Cli {
    /// Compare request JSON (`{"spotName": ..., "vector": [...]}`); `-` or omitted reads stdin
    #[arg(value_name = "REQUEST.json", conflicts_with = "check")]
    pub request: Option<PathBuf>,

    /// Load the reference table and print a summary instead of classifying
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// Request file to read, or `None` for stdin.
    pub fn request_path(&self) -> Option<&Path> {
        self.request
            .as_deref()
            .filter(|path| *path != Path::new("-"))
    }
}
