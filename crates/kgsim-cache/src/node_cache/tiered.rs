use std::path::Path;

use kgsim_core::config::CacheConfig;
use kgsim_core::errors::ConfigError;
use kgsim_core::EntityRecord;
use kgsim_observability::events;
use tracing::debug;

use super::{CacheCounters, CacheHitTier, CacheStats, INodeCache, L1MemoryCache, PreloadedTier};
use crate::keys::{CachedField, NodeKey};

/// Default node cache: preloaded tier first, then the bounded moka tier.
pub struct TieredNodeCache {
    preloaded: PreloadedTier,
    memory: L1MemoryCache,
    counters: CacheCounters,
}

impl TieredNodeCache {
    /// In-memory tier only.
    pub fn new(capacity: u64, idle_secs: u64) -> Self {
        Self::with_preloaded(capacity, idle_secs, PreloadedTier::new())
    }

    pub fn with_preloaded(capacity: u64, idle_secs: u64, preloaded: PreloadedTier) -> Self {
        Self {
            preloaded,
            memory: L1MemoryCache::new(capacity, idle_secs),
            counters: CacheCounters::default(),
        }
    }

    pub fn with_records(capacity: u64, records: impl IntoIterator<Item = EntityRecord>) -> Self {
        Self::with_preloaded(capacity, 0, PreloadedTier::from_records(records))
    }

    /// Build from config, loading `preload_path` when set.
    pub fn from_config(config: &CacheConfig) -> Result<Self, ConfigError> {
        let preloaded = match &config.preload_path {
            Some(path) => {
                let tier = PreloadedTier::load_json(Path::new(path))?;
                events::cache_preloaded(path, tier.len());
                tier
            }
            None => PreloadedTier::new(),
        };
        Ok(Self::with_preloaded(
            config.node_capacity,
            config.node_idle_secs,
            preloaded,
        ))
    }

    /// Look up a key across tiers, reporting which tier answered.
    pub fn lookup(&self, key: &NodeKey) -> (Option<CachedField>, CacheHitTier) {
        if let Some(value) = self.preloaded.get(key) {
            debug!(entity = %key.entity, scope = %key.scope, tier = "preloaded", "cache hit");
            return (Some(value), CacheHitTier::Preloaded);
        }
        if let Some(value) = self.memory.get(key) {
            debug!(entity = %key.entity, scope = %key.scope, tier = "memory", "cache hit");
            return (Some(value), CacheHitTier::Memory);
        }
        (None, CacheHitTier::Miss)
    }
}

impl INodeCache for TieredNodeCache {
    fn get(&self, key: &NodeKey) -> Option<CachedField> {
        let (value, tier) = self.lookup(key);
        match tier {
            CacheHitTier::Miss => self.counters.miss(),
            _ => self.counters.hit(),
        }
        value
    }

    fn put(&self, key: NodeKey, value: CachedField) {
        self.counters.insert();
        self.memory.insert(key, value);
    }

    fn evict(&self, key: &NodeKey) {
        self.memory.invalidate(key);
    }

    /// Clears the in-memory tier; the preloaded tier is read-only.
    fn clear(&self) {
        self.memory.clear();
        self.counters.reset();
    }

    fn stats(&self) -> CacheStats {
        self.memory.sync();
        CacheStats {
            evictions: self.memory.evictions(),
            preloaded: self.preloaded.len() as u64,
            entries: self.memory.len(),
            ..self.counters.snapshot()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::FieldScope;
    use kgsim_core::EmbeddingKind;
    use std::sync::Arc;

    fn record(entity: &str, label: &str) -> EntityRecord {
        let mut r = EntityRecord::new(entity);
        r.label = Some(label.to_string());
        r
    }

    #[test]
    fn miss_on_empty() {
        let cache = TieredNodeCache::new(100, 0);
        let (value, tier) = cache.lookup(&NodeKey::new("Q1", FieldScope::Label));
        assert!(value.is_none());
        assert_eq!(tier, CacheHitTier::Miss);
    }

    #[test]
    fn memory_hit_after_put() {
        let cache = TieredNodeCache::new(100, 0);
        let key = NodeKey::new("Q1", FieldScope::ClassCount);
        cache.put(key.clone(), CachedField::Count(3));
        assert_eq!(cache.lookup(&key), (Some(CachedField::Count(3)), CacheHitTier::Memory));
    }

    #[test]
    fn preloaded_tier_is_checked_first() {
        let cache = TieredNodeCache::with_records(100, [record("Q1", "one")]);
        let key = NodeKey::new("Q1", FieldScope::Label);
        cache.put(key.clone(), CachedField::Label(Arc::from("stale")));
        let (value, tier) = cache.lookup(&key);
        assert_eq!(tier, CacheHitTier::Preloaded);
        assert_eq!(value, Some(CachedField::Label(Arc::from("one"))));

        let missing_kind = NodeKey::new("Q1", FieldScope::Embedding(EmbeddingKind::Complex));
        assert_eq!(cache.get(&missing_kind), Some(CachedField::Empty));
    }

    #[test]
    fn evict_and_clear_only_touch_memory() {
        let cache = TieredNodeCache::with_records(100, [record("Q1", "one")]);
        let key = NodeKey::new("Q2", FieldScope::Label);
        cache.put(key.clone(), CachedField::Empty);
        cache.evict(&key);
        assert_eq!(cache.get(&key), None);
        cache.clear();
        assert!(cache.get(&NodeKey::new("Q1", FieldScope::Label)).is_some());
    }

    #[test]
    fn stats_count_hits_misses_and_inserts() {
        let cache = TieredNodeCache::with_records(100, [record("Q1", "one")]);
        let key = NodeKey::new("Q2", FieldScope::Label);
        cache.get(&key);
        cache.put(key.clone(), CachedField::Empty);
        cache.get(&key);
        cache.get(&NodeKey::new("Q1", FieldScope::Label));
        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.preloaded, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn from_config_loads_preload_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, serde_json::to_string(&vec![record("Q9", "nine")]).unwrap())
            .unwrap();
        let config = CacheConfig {
            preload_path: Some(path.display().to_string()),
            ..CacheConfig::default()
        };
        let cache = TieredNodeCache::from_config(&config).unwrap();
        assert_eq!(cache.stats().preloaded, 1);
    }
}
