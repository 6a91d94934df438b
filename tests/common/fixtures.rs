//! Test fixtures for integration tests.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use spotmatch::encode_feature;
use tempfile::TempDir;

pub const DEFAULT_DIM: usize = 64;

/// Builds a `features` table in a temporary SQLite file.
#[derive(Default)]
pub struct FeatureDbBuilder {
    rows: Vec<(String, Vec<u8>)>,
    skip_table: bool,
}

impl FeatureDbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vector(mut self, label: &str, vector: &[f32]) -> Self {
        self.rows.push((label.to_string(), encode_feature(vector)));
        self
    }

    pub fn raw(mut self, label: &str, bytes: Vec<u8>) -> Self {
        self.rows.push((label.to_string(), bytes));
        self
    }

    pub fn seeded(self, label: &str, seed: u64) -> Self {
        self.vector(label, &seeded_vector(seed, DEFAULT_DIM))
    }

    pub fn without_table(mut self) -> Self {
        self.skip_table = true;
        self
    }

    pub fn build(self) -> FeatureDb {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("train_features.db");

        let conn = Connection::open(&path).expect("open sqlite");
        if !self.skip_table {
            conn.execute_batch(
                "CREATE TABLE features (id INTEGER PRIMARY KEY, label TEXT NOT NULL, feature BLOB NOT NULL)",
            )
            .expect("create table");
            for (label, feature) in &self.rows {
                conn.execute(
                    "INSERT INTO features (label, feature) VALUES (?1, ?2)",
                    params![label, feature],
                )
                .expect("insert row");
            }
        }

        FeatureDb { _dir: dir, path }
    }
}

/// Keeps the temp directory alive for as long as the database is in use.
pub struct FeatureDb {
    _dir: TempDir,
    path: PathBuf,
}

impl FeatureDb {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Deterministic non-negative vector in `[0, 1)`, like pooled image features.
pub fn seeded_vector(seed: u64, dim: usize) -> Vec<f32> {
    (0..dim)
        .map(|i| {
            let mixed = splitmix64(seed.wrapping_mul(1_000_003).wrapping_add(i as u64)) % 1000;
            mixed as f32 / 1000.0
        })
        .collect()
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// `base` nudged by a small deterministic offset, still non-negative.
pub fn perturbed(base: &[f32], amount: f32) -> Vec<f32> {
    base.iter()
        .enumerate()
        .map(|(i, v)| {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            (v + sign * amount).max(0.0)
        })
        .collect()
}
