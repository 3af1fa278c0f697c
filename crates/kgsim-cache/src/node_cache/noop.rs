use super::{CacheCounters, CacheStats, INodeCache};
use crate::keys::{CachedField, NodeKey};

/// Cache that stores nothing; every lookup goes to the backend.
#[derive(Debug, Default)]
pub struct NoopNodeCache {
    counters: CacheCounters,
}

impl NoopNodeCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl INodeCache for NoopNodeCache {
    fn get(&self, _key: &NodeKey) -> Option<CachedField> {
        self.counters.miss();
        None
    }

    fn put(&self, _key: NodeKey, _value: CachedField) {}

    fn evict(&self, _key: &NodeKey) {}

    fn clear(&self) {
        self.counters.reset();
    }

    fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }
}
