//! Cache of the cleaner's output, keyed by upload content and cleaning rules.
//!
//! Only the most recent upload is kept: a new key evicts the previous entry.

use crate::data::cleaner::CleaningReport;
use crate::data::record::ClimateTable;
use crate::error::Result;
use log::debug;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// A cleaned upload and how it was produced.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub source_name: String,
    pub table: ClimateTable,
    pub report: CleaningReport,
}

#[derive(Default)]
pub struct CleanCache {
    entry: Option<(String, Arc<CleanedDataset>)>,
    hits: usize,
    misses: usize,
}

impl CleanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine the upload digest with a fingerprint of the cleaning rules.
    pub fn key(upload_digest: &str, rules_fingerprint: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(upload_digest.as_bytes());
        hasher.update(b"\0");
        hasher.update(rules_fingerprint.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(&self.entry, Some((k, _)) if k == key)
    }

    /// Return the cached dataset for `key`, or run `clean` and cache its result.
    /// Errors are not cached.
    pub fn get_or_clean<F>(&mut self, key: &str, clean: F) -> Result<Arc<CleanedDataset>>
    where
        F: FnOnce() -> Result<CleanedDataset>,
    {
        if let Some((cached_key, dataset)) = &self.entry {
            if cached_key == key {
                self.hits += 1;
                debug!("Clean cache hit for {}", &key[..key.len().min(12)]);
                return Ok(Arc::clone(dataset));
            }
        }

        self.misses += 1;
        debug!("Clean cache miss for {}", &key[..key.len().min(12)]);
        let dataset = Arc::new(clean()?);
        self.entry = Some((key.to_string(), Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    fn dataset(name: &str) -> CleanedDataset {
        CleanedDataset {
            source_name: name.to_string(),
            table: ClimateTable::default(),
            report: CleaningReport::default(),
        }
    }

    #[test]
    fn test_same_key_reuses_entry() {
        let mut cache = CleanCache::new();
        let key = CleanCache::key("abc", "rules");

        let first = cache.get_or_clean(&key, || Ok(dataset("first"))).unwrap();
        let second = cache.get_or_clean(&key, || Ok(dataset("second"))).unwrap();

        assert_eq!(second.source_name, "first");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn test_new_key_replaces_entry() {
        let mut cache = CleanCache::new();
        let old = CleanCache::key("abc", "rules");
        let new = CleanCache::key("def", "rules");

        cache.get_or_clean(&old, || Ok(dataset("old"))).unwrap();
        cache.get_or_clean(&new, || Ok(dataset("new"))).unwrap();

        assert!(cache.contains(&new));
        assert!(!cache.contains(&old));
    }

    #[test]
    fn test_rules_change_the_key() {
        assert_ne!(CleanCache::key("abc", "a"), CleanCache::key("abc", "b"));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = CleanCache::new();
        let key = CleanCache::key("abc", "rules");
        let result = cache.get_or_clean(&key, || Err(DashboardError::EmptyResultSet));

        assert!(result.is_err());
        assert!(!cache.contains(&key));
        assert_eq!(cache.stats(), (0, 1));
    }
}
