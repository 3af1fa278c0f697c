//! Per-node cache behind the `INodeCache` seam.
//!
//! Tiers: preloaded (read-only JSON dump) → L1 (moka in-memory, bounded).
//! The preloaded tier is checked first because it is loaded once at startup
//! and never evicts.

pub mod l1_memory;
pub mod noop;
pub mod preloaded;
pub mod tiered;

pub use l1_memory::L1MemoryCache;
pub use noop::NoopNodeCache;
pub use preloaded::PreloadedTier;
pub use tiered::TieredNodeCache;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::keys::{CachedField, NodeKey};

/// Shared, size-bounded, thread-safe store of per-node fields.
///
/// Readers and writers may race to fill the same key; population is
/// idempotent, so no lock is held across fetch-then-put.
pub trait INodeCache: Send + Sync {
    /// `None` means not looked up yet.
    fn get(&self, key: &NodeKey) -> Option<CachedField>;

    fn put(&self, key: NodeKey, value: CachedField);

    fn evict(&self, key: &NodeKey);

    fn clear(&self);

    fn stats(&self) -> CacheStats;
}

/// Which tier answered a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHitTier {
    Preloaded,
    Memory,
    Miss,
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    /// Entities held by the preloaded tier.
    pub preloaded: u64,
    /// Approximate entries in the in-memory tier.
    pub entries: u64,
}

impl CacheStats {
    /// Hit rate (0.0–1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
}

impl CacheCounters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            ..Default::default()
        }
    }

    pub(crate) fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
    }
}
