//! Reference feature store.
//!
//! Rows of `(label, feature)` are bulk-read from a [`FeatureSource`] (normally the
//! SQLite table at [`Config::feature_db_path`](crate::Config::feature_db_path)),
//! decoded into `f32` vectors, and retained in a [`ReferenceStore`].
//!
//! # Layout
//!
//! Each `feature` blob is a packed array of native-endian `f32` values. Every row
//! in a table must decode to the same dimension; a ragged table is rejected as a
//! whole rather than partially loaded.
//!
//! # Loading
//!
//! [`ReferenceStore::ensure_loaded`] populates the store on first use and is a
//! cheap `Arc` clone afterwards. [`ReferenceStore::reload`] is the only way to
//! replace a loaded set; there is no per-entry insert or delete.

pub mod cache;
pub mod error;
pub mod reference;
pub mod source;


pub use cache::ReferenceStore;
pub use error::{StoreError, StoreResult};
pub use reference::{ReferenceEntry, ReferenceSet, decode_feature, encode_feature};
#[cfg(any(test, feature = "mock"))]
pub use source::MockFeatureSource;
pub use source::{FeatureRow, FeatureSource, SqliteFeatureSource};
