use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::constants::FEATURE_TABLE;

use super::error::{StoreError, StoreResult};

/// One undecoded `(label, feature bytes)` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    pub label: String,
    pub feature: Vec<u8>,
}

impl FeatureRow {
    pub fn new(label: impl Into<String>, feature: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            feature,
        }
    }
}

/// Bulk-readable source of reference rows.
pub trait FeatureSource: Send + Sync {
    /// Reads every row. Called at most once per successful load.
    fn load_rows(&self) -> StoreResult<Vec<FeatureRow>>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

/// Reads `SELECT label, feature FROM features` from a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteFeatureSource {
    path: PathBuf,
}

impl SqliteFeatureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeatureSource for SqliteFeatureSource {
    fn load_rows(&self) -> StoreResult<Vec<FeatureRow>> {
        // SQLite would happily create an empty database here.
        if !self.path.exists() {
            return Err(StoreError::NotFound {
                path: self.path.clone(),
            });
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let mut stmt = conn.prepare(&format!("SELECT label, feature FROM {FEATURE_TABLE}"))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(FeatureRow {
                    label: row.get(0)?,
                    feature: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(path = %self.path.display(), rows = rows.len(), "Read feature rows");

        if rows.is_empty() {
            return Err(StoreError::Empty {
                path: self.path.clone(),
            });
        }

        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockFeatureSource;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::{FeatureRow, FeatureSource};
    use crate::store::error::{StoreError, StoreResult};
    use crate::store::reference::encode_feature;

    /// In-memory source that counts reads and can be told to fail.
    ///
    /// Clones share state, so a test can keep a handle after moving one into a
    /// [`ReferenceStore`](crate::store::ReferenceStore).
    #[derive(Debug, Clone, Default)]
    pub struct MockFeatureSource {
        rows: Arc<Mutex<Vec<FeatureRow>>>,
        loads: Arc<AtomicUsize>,
        failures_remaining: Arc<AtomicUsize>,
    }

    impl MockFeatureSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_vectors<'a>(vectors: impl IntoIterator<Item = (&'a str, Vec<f32>)>) -> Self {
            let source = Self::new();
            for (label, vector) in vectors {
                source.push(label, &vector);
            }
            source
        }

        pub fn push(&self, label: &str, vector: &[f32]) {
            self.push_raw(FeatureRow::new(label, encode_feature(vector)));
        }

        pub fn push_raw(&self, row: FeatureRow) {
            self.rows.lock().push(row);
        }

        pub fn clear(&self) {
            self.rows.lock().clear();
        }

        /// Makes the next `n` reads fail.
        pub fn fail_next(&self, n: usize) {
            self.failures_remaining.store(n, Ordering::SeqCst);
        }

        /// Number of times [`load_rows`](FeatureSource::load_rows) was called.
        pub fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }
    }

    impl FeatureSource for MockFeatureSource {
        fn load_rows(&self) -> StoreResult<Vec<FeatureRow>> {
            self.loads.fetch_add(1, Ordering::SeqCst);

            let should_fail = self
                .failures_remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if should_fail {
                return Err(StoreError::SourceFailed("injected failure".to_string()));
            }

            Ok(self.rows.lock().clone())
        }

        fn describe(&self) -> String {
            "mock".to_string()
        }
    }
}
