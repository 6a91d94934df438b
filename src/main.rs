//! Spotmatch CLI entrypoint.
//!
//! ```text
//! spotmatch [REQUEST.json | -]   classify one compare request, print the verdict
//! spotmatch --check              load the reference table and print a summary
//! ```

mod cli;

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mimalloc::MiMalloc;
use serde_json::json;

use spotmatch::{Classifier, CompareRequest, Config, ReferenceStore, SqliteFeatureSource};

use crate::cli::Cli;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        feature_db = %config.feature_db_path.display(),
        policy = %config.policy,
        similarity = %config.similarity_mode,
        "Spotmatch starting"
    );

    let store = Arc::new(ReferenceStore::new(SqliteFeatureSource::new(
        config.feature_db_path.clone(),
    )));
    let classifier =
        Classifier::new(store, config.policy).with_similarity_mode(config.similarity_mode);

    if cli.check {
        return run_check(&classifier);
    }

    let input = match cli.request_path() {
        None => read_stdin()?,
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))?,
    };

    let request: CompareRequest =
        serde_json::from_str(&input).context("request is not a valid compare request")?;

    let verdict = classifier.classify_request(&request)?;
    println!("{}", serde_json::to_string_pretty(&verdict)?);

    Ok(())
}

fn run_check(classifier: &Classifier<SqliteFeatureSource>) -> anyhow::Result<()> {
    let set = classifier.store().ensure_loaded()?;

    let summary = json!({
        "source": classifier.store().source().path().display().to_string(),
        "entries": set.len(),
        "dimension": set.dimension(),
        "labels": set.labels(),
        "policy": classifier.policy().name(),
        "similarity": classifier.similarity_mode().as_str(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read request from stdin")?;
    Ok(buf)
}
