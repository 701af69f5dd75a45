use std::path::{Path, PathBuf};

use crate::BuildUnit;

/// What a cached unit was requested by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheKey {
    Path(PathBuf),
    Content(String),
}

/// Memo of build units for the lifetime of a process.
///
/// Entries are kept in insertion order and never evicted. Lookups return the
/// first matching entry. Inserting a key twice keeps both entries. The cache
/// has no interior locking; share it across threads only behind the owner's
/// own synchronization.
#[derive(Debug, Default)]
pub struct BuildUnitCache {
    entries: Vec<(CacheKey, BuildUnit)>,
}

impl BuildUnitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `unit` under `key` and return a handle to the stored unit.
    pub fn insert(&mut self, key: CacheKey, unit: BuildUnit) -> &mut BuildUnit {
        self.entries.push((key, unit));
        let last = self.entries.len() - 1;
        &mut self.entries[last].1
    }

    pub fn insert_by_path(&mut self, path: impl Into<PathBuf>, unit: BuildUnit) -> &mut BuildUnit {
        self.insert(CacheKey::Path(path.into()), unit)
    }

    pub fn insert_by_content(&mut self, code: impl Into<String>, unit: BuildUnit) -> &mut BuildUnit {
        self.insert(CacheKey::Content(code.into()), unit)
    }

    pub fn lookup(&mut self, key: &CacheKey) -> Option<&mut BuildUnit> {
        let found = self
            .entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, unit)| unit);
        tracing::debug!(?key, hit = found.is_some(), "build unit cache lookup");
        found
    }

    pub fn lookup_by_path(&mut self, path: &Path) -> Option<&mut BuildUnit> {
        self.lookup(&CacheKey::Path(path.to_path_buf()))
    }

    pub fn lookup_by_content(&mut self, code: &str) -> Option<&mut BuildUnit> {
        self.lookup(&CacheKey::Content(code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
