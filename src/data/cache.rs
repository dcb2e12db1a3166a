//! Memoizing cache for loaded match tables.
//!
//! Entries are keyed by source path and validated against a SHA-256 digest of
//! the file content, so an edited file is reloaded while an unchanged one is
//! served from memory. The digest is taken again after loading; a table whose
//! file changed mid-load is returned but not cached.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::loader::{self, DataLoadError};
use super::model::MatchTable;

/// Content identity of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSignature {
    pub len: u64,
    /// 64-character lowercase hex SHA-256.
    pub digest: String,
}

impl SourceSignature {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        SourceSignature {
            len: bytes.len() as u64,
            digest: format!("{:x}", hasher.finalize()),
        }
    }

    pub fn of_file(path: &Path) -> Result<Self, DataLoadError> {
        let bytes = std::fs::read(path).map_err(|e| DataLoadError::io(path, e))?;
        Ok(Self::of_bytes(&bytes))
    }
}

struct CacheEntry {
    signature: SourceSignature,
    table: Arc<MatchTable>,
}

/// Loaded tables keyed by (path, content signature).
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
    hits: usize,
    misses: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it with [`loader::load_file`]
    /// when absent or when the file content changed.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<MatchTable>, DataLoadError> {
        self.get_or_load_with(path, loader::load_file)
    }

    /// Same as [`get_or_load`](Self::get_or_load) with a caller-supplied load function.
    pub fn get_or_load_with<F>(
        &mut self,
        path: &Path,
        load: F,
    ) -> Result<Arc<MatchTable>, DataLoadError>
    where
        F: FnOnce(&Path) -> Result<MatchTable, DataLoadError>,
    {
        let signature = SourceSignature::of_file(path)?;

        if let Some(entry) = self.entries.get(path) {
            if entry.signature == signature {
                self.hits += 1;
                log::debug!("dataset cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.table));
            }
            log::debug!("{} changed on disk, reloading", path.display());
        }

        self.misses += 1;
        let table = Arc::new(load(path)?);

        if SourceSignature::of_file(path)? != signature {
            log::warn!("{} changed while loading, not caching", path.display());
            self.entries.remove(path);
            return Ok(table);
        }

        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                signature,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
