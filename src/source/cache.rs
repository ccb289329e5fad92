use lru::LruCache;
use std::num::NonZeroUsize;

use super::DailySales;
use crate::types::CacheKey;

/// Keeps recently fetched payloads by the range they were requested for
pub struct ResponseCache {
    cache: LruCache<CacheKey, DailySales>,
}

impl ResponseCache {
    /// Create a cache holding at most `capacity` ranges (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Store a payload, evicting the least recently used one when full
    pub fn store(&mut self, key: CacheKey, sales: DailySales) {
        self.cache.put(key, sales);
    }

    /// Retrieve a payload and mark it as recently used
    pub fn get(&mut self, key: &CacheKey) -> Option<&DailySales> {
        self.cache.get(key)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.cache.contains(key)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(16)
    }
}
