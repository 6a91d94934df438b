use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use super::error::StoreResult;
use super::reference::ReferenceSet;
use super::source::FeatureSource;

/// Load-once holder for a [`ReferenceSet`].
///
/// The set is either absent or fully built; callers never see a partial load.
/// `load_guard` serializes loads so the source is read at most once per
/// successful population. Reads only take the `RwLock` long enough to clone
/// the `Arc`.
pub struct ReferenceStore<S> {
    source: S,
    current: RwLock<Option<Arc<ReferenceSet>>>,
    load_guard: Mutex<()>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for ReferenceStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceStore")
            .field("source", &self.source)
            .field("loaded", &self.current.read().is_some())
            .finish()
    }
}

impl<S: FeatureSource> ReferenceStore<S> {
    /// Creates an unloaded store. Nothing is read until first use.
    pub fn new(source: S) -> Self {
        Self {
            source,
            current: RwLock::new(None),
            load_guard: Mutex::new(()),
        }
    }

    /// Creates a store that is already populated with `set`.
    pub fn from_set(source: S, set: ReferenceSet) -> Self {
        Self {
            source,
            current: RwLock::new(Some(Arc::new(set))),
            load_guard: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// Returns the loaded set, reading the source on first use.
    ///
    /// A failed load leaves the store empty; the next call tries again.
    pub fn ensure_loaded(&self) -> StoreResult<Arc<ReferenceSet>> {
        if let Some(set) = self.current.read().as_ref() {
            return Ok(Arc::clone(set));
        }

        let _guard = self.load_guard.lock();

        // Another caller may have finished loading while we waited.
        if let Some(set) = self.current.read().as_ref() {
            return Ok(Arc::clone(set));
        }

        let set = Arc::new(self.load()?);
        *self.current.write() = Some(Arc::clone(&set));
        Ok(set)
    }

    /// Rebuilds the set from the source.
    ///
    /// The new set replaces the old one only if the whole load succeeds.
    pub fn reload(&self) -> StoreResult<Arc<ReferenceSet>> {
        let _guard = self.load_guard.lock();
        let set = Arc::new(self.load()?);
        *self.current.write() = Some(Arc::clone(&set));
        Ok(set)
    }

    fn load(&self) -> StoreResult<ReferenceSet> {
        let origin = self.source.describe();
        let result = self
            .source
            .load_rows()
            .and_then(ReferenceSet::from_rows);

        match &result {
            Ok(set) => info!(
                source = %origin,
                entries = set.len(),
                dimension = set.dimension().unwrap_or(0),
                labels = set.labels().len(),
                "Reference set loaded"
            ),
            Err(e) => warn!(source = %origin, error = %e, "Reference set load failed"),
        }

        result
    }
}
