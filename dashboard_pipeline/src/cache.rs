//! Load cache keyed by source identity.
//!
//! Every user interaction re-runs the whole pipeline, so the workbook read is
//! memoized. A source is identified by its path together with the file's size and
//! modification time (`SourceFingerprint`). As long as the fingerprint matches, the
//! cached `RawDataset` is returned without touching the workbook; when it changes,
//! the entry is replaced wholesale.
//!
//! The cache is not synchronized. A session owns it and passes `&mut` access down;
//! share it behind a `Mutex` if that ever changes.
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use dashboard_common::model::RawDataset;
use dashboard_common::LoadError;
use log::info;

/// Identity of a source file at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    /// Path as given by the caller.
    pub path: PathBuf,
    /// Last modification time, if the platform reports one.
    pub modified: Option<SystemTime>,
    /// File size in bytes.
    pub len: u64,
}

impl SourceFingerprint {
    /// Reads the fingerprint of `path` from the file system.
    pub fn of(path: &Path) -> Result<Self, LoadError> {
        let meta = fs::metadata(path).map_err(|e| LoadError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

struct CacheEntry {
    fingerprint: SourceFingerprint,
    dataset: Arc<RawDataset>,
}

/// Memoized workbook loads, one entry per path.
#[derive(Default)]
pub struct LoadCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl LoadCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached dataset for `path` if its fingerprint is unchanged,
    /// otherwise calls `loader` and caches the result.
    ///
    /// A failed load drops any stale entry for `path`, so the next call retries.
    pub fn get_or_load<F>(
        &mut self,
        path: &Path,
        loader: F,
    ) -> Result<Arc<RawDataset>, LoadError>
    where
        F: FnOnce(&Path) -> Result<RawDataset, LoadError>,
    {
        let fingerprint = SourceFingerprint::of(path)?;
        if let Some(entry) = self.entries.get(path) {
            if entry.fingerprint == fingerprint {
                info!("Cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        info!("Cache miss for {}, reading workbook", path.display());
        self.entries.remove(path);
        let dataset = Arc::new(loader(path)?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                fingerprint,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Fingerprint stored for `path`, if cached.
    pub fn fingerprint(&self, path: &Path) -> Option<&SourceFingerprint> {
        self.entries.get(path).map(|entry| &entry.fingerprint)
    }

    /// Drops the entry for `path`. Returns `true` if one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
