//! L1 in-memory node cache using moka.
//!
//! TinyLFU admission, size-bounded eviction, optional idle expiry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use crate::keys::{CachedField, NodeKey};

pub struct L1MemoryCache {
    cache: Cache<NodeKey, CachedField>,
    evictions: Arc<AtomicU64>,
}

impl L1MemoryCache {
    /// Create a cache holding at most `max_entries`. `idle_secs == 0`
    /// disables idle expiry.
    pub fn new(max_entries: u64, idle_secs: u64) -> Self {
        let evictions = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&evictions);
        let mut builder = Cache::builder()
            .max_capacity(max_entries)
            .eviction_listener(move |_key, _value, cause| {
                if cause.was_evicted() {
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            });
        if idle_secs > 0 {
            builder = builder.time_to_idle(Duration::from_secs(idle_secs));
        }
        Self {
            cache: builder.build(),
            evictions,
        }
    }

    pub fn get(&self, key: &NodeKey) -> Option<CachedField> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: NodeKey, value: CachedField) {
        self.cache.insert(key, value);
    }

    pub fn invalidate(&self, key: &NodeKey) {
        self.cache.invalidate(key);
    }

    /// Number of entries currently in the cache.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries dropped by the size or expiry policy so far.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Flush moka's pending maintenance so counts and evictions are current.
    pub fn sync(&self) {
        self.cache.run_pending_tasks();
    }
}
