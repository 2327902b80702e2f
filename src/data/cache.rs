//! Source Cache Module
//! Memoizes loaded record sets per source file.

use super::{load, LoaderError, RecordSet};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Cheap change detector taken from file metadata; the content is not read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

impl Fingerprint {
    fn of(path: &Path) -> std::io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

struct CacheEntry {
    fingerprint: Fingerprint,
    records: RecordSet,
}

/// Loaded record sets keyed by canonical source path.
///
/// An entry is reused while the file's length and modification time are
/// unchanged, and reloaded otherwise. [`SourceCache::invalidate`] forces the
/// next lookup to reload.
#[derive(Default)]
pub struct SourceCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached record set for `path`, loading it if absent or stale.
    pub fn get_or_load(&mut self, path: &Path) -> Result<RecordSet, LoaderError> {
        self.lookup(path).map(|(records, _)| records)
    }

    /// Like [`SourceCache::get_or_load`], also reporting whether the set was
    /// freshly loaded rather than served from the cache.
    pub fn lookup(&mut self, path: &Path) -> Result<(RecordSet, bool), LoaderError> {
        let unavailable = |source| LoaderError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let key = path.canonicalize().map_err(unavailable)?;
        let fingerprint = Fingerprint::of(&key).map_err(unavailable)?;

        if let Some(entry) = self.entries.get(&key) {
            if entry.fingerprint == fingerprint {
                debug!(path = %key.display(), "order source cache hit");
                return Ok((entry.records.clone(), false));
            }
            debug!(path = %key.display(), "order source changed, reloading");
        }

        // A failed reload must not leave the stale set behind.
        self.entries.remove(&key);
        let records = load(&key)?;
        self.entries.insert(
            key,
            CacheEntry {
                fingerprint,
                records: records.clone(),
            },
        );
        Ok((records, true))
    }

    /// Drop the entry for `path`. Returns whether one was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    /// Drop every cached entry.
    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{write_source, ORDERS_CSV, SCENARIO_CSV};
    use std::fs::File;

    fn row_count(cache: &mut SourceCache, path: &Path) -> usize {
        cache.get_or_load(path).unwrap().len()
    }

    #[test]
    fn repeated_lookups_reuse_the_loaded_set() {
        let file = write_source(SCENARIO_CSV);
        let mut cache = SourceCache::new();
        assert_eq!(row_count(&mut cache, file.path()), 2);

        // Same length and mtime: the cache must not notice the new content.
        let mtime = fs::metadata(file.path()).unwrap().modified().unwrap();
        fs::write(file.path(), SCENARIO_CSV.replace("Aarav", "Kabir")).unwrap();
        File::options()
            .write(true)
            .open(file.path())
            .unwrap()
            .set_modified(mtime)
            .unwrap();

        let records = cache.get_or_load(file.path()).unwrap();
        let rows = records.display_rows();
        assert_eq!(rows[0][1], "Aarav Mehta");
        assert_eq!(cache.len(), 1);

        assert!(cache.invalidate(file.path()));
        let rows = cache.get_or_load(file.path()).unwrap().display_rows();
        assert_eq!(rows[0][1], "Kabir Mehta");
    }

    #[test]
    fn clear_forces_a_reload() {
        let first = write_source(SCENARIO_CSV);
        let second = write_source(ORDERS_CSV);
        let mut cache = SourceCache::new();
        cache.get_or_load(first.path()).unwrap();
        cache.get_or_load(second.path()).unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert_eq!(cache.len(), 0);

        let (records, reloaded) = cache.lookup(first.path()).unwrap();
        assert!(reloaded);
        assert_eq!(records.len(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn lookup_reports_fresh_loads() {
        let file = write_source(SCENARIO_CSV);
        let mut cache = SourceCache::new();
        assert!(cache.lookup(file.path()).unwrap().1);
        assert!(!cache.lookup(file.path()).unwrap().1);

        fs::write(file.path(), ORDERS_CSV).unwrap();
        let (records, reloaded) = cache.lookup(file.path()).unwrap();
        assert!(reloaded);
        assert_eq!(records.len(), 6);
        assert!(!cache.lookup(file.path()).unwrap().1);
    }

    #[test]
    fn changed_source_is_reloaded() {
        let file = write_source(SCENARIO_CSV);
        let mut cache = SourceCache::new();
        assert_eq!(row_count(&mut cache, file.path()), 2);

        fs::write(file.path(), ORDERS_CSV).unwrap();
        assert_eq!(row_count(&mut cache, file.path()), 6);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_reload_drops_the_stale_entry() {
        let file = write_source(SCENARIO_CSV);
        let mut cache = SourceCache::new();
        cache.get_or_load(file.path()).unwrap();

        fs::write(file.path(), "order_id,customer_name\n1,Aarav Mehta\n").unwrap();
        assert!(matches!(
            cache.get_or_load(file.path()),
            Err(LoaderError::SchemaMismatch { .. })
        ));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn missing_source_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = SourceCache::new();
        let err = cache.get_or_load(&dir.path().join("orders.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::SourceUnavailable { .. }));
        assert!(!cache.invalidate(&dir.path().join("orders.csv")));
    }
}
