use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use super::PosterLookup;

/// Cache key: the title and the optional year used to disambiguate it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PosterKey {
    pub title: String,
    pub year: Option<i32>,
}

impl PosterKey {
    pub fn new(title: &str, year: Option<i32>) -> Self {
        Self {
            title: title.to_string(),
            year,
        }
    }
}

/// Bounded least-recently-used cache of poster lookups
///
/// Safe to share between concurrent requests; racing inserts for the same key
/// keep whichever lands last.
pub struct PosterCache {
    entries: Mutex<LruCache<PosterKey, PosterLookup>>,
}

impl PosterCache {
    /// A capacity of 0 is treated as 1
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &PosterKey) -> Option<PosterLookup> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: PosterKey, lookup: PosterLookup) {
        self.entries.lock().put(key, lookup);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
