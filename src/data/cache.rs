use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{self, LoadError, LoadOutcome};
use super::model::ListingTable;

/// Memoizes loaded tables by file path.
///
/// The source files are treated as read-only for the session, so a cached
/// table stays valid until [`LoadCache::invalidate`] or [`LoadCache::clear`]
/// is called. Failed loads are not cached.
#[derive(Debug, Default)]
pub struct LoadCache {
    tables: HashMap<PathBuf, Arc<ListingTable>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on a miss.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<ListingTable>, LoadError> {
        if let Some(table) = self.tables.get(path) {
            log::debug!("Load cache hit for {}", path.display());
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(loader::load_file(path)?);
        self.tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    /// Cached load that absorbs failures into an empty table.
    pub fn load_or_empty(&mut self, path: &Path) -> LoadOutcome {
        match self.get_or_load(path) {
            Ok(table) => LoadOutcome {
                table,
                failure: None,
            },
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                LoadOutcome::failed(e)
            }
        }
    }

    /// Drop the entry for one path. Returns whether it was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.tables.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_items(file: &tempfile::NamedTempFile, body: &str) {
        std::fs::write(file.path(), body).unwrap();
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write_items(&file, r#"{"items": [{"deposit": 1}]}"#);

        let mut cache = LoadCache::new();
        let first = cache.get_or_load(file.path()).unwrap();

        // Rewriting the file does not change what the cache returns.
        write_items(&file, r#"{"items": [{"deposit": 1}, {"deposit": 2}]}"#);
        let second = cache.get_or_load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);

        assert!(cache.invalidate(file.path()));
        let third = cache.get_or_load(file.path()).unwrap();
        assert_eq!(third.len(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = LoadCache::new();
        let outcome = cache.load_or_empty(Path::new("missing/raw_data.json"));
        assert!(outcome.table.is_empty());
        assert!(outcome.failure.is_some());
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write_items(&file, r#"{"items": []}"#);

        let mut cache = LoadCache::new();
        cache.get_or_load(file.path()).unwrap();
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
