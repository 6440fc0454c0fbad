use crate::error::DatasetError;
use crate::loader::load;
use core_types::{Listing, PredictionBasis};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Session-scoped memo of loaded datasets.
///
/// Sources are treated as static for the lifetime of the cache, so entries
/// are never invalidated. A failed load is not cached.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<(PathBuf, PredictionBasis), Arc<[Listing]>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the listings for `source`, loading them on first use.
    pub fn get_or_load(
        &mut self,
        source: &Path,
        basis: PredictionBasis,
    ) -> Result<Arc<[Listing]>, DatasetError> {
        let key = (
            source.canonicalize().unwrap_or_else(|_| source.to_path_buf()),
            basis,
        );

        if let Some(listings) = self.entries.get(&key) {
            tracing::debug!(path = %source.display(), "Dataset cache hit.");
            return Ok(Arc::clone(listings));
        }

        tracing::debug!(path = %source.display(), "Dataset cache miss, loading from disk.");
        let listings: Arc<[Listing]> = load(source, basis)?.into();
        self.entries.insert(key, Arc::clone(&listings));
        Ok(listings)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
