use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-node and memo cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Max entries in the in-memory node cache tier.
    pub node_capacity: u64,
    /// Idle expiry of node cache entries, in seconds. 0 disables expiry.
    pub node_idle_secs: u64,
    /// Max memoized candidate pools and top-similarity regions.
    pub region_capacity: u64,
    /// Optional JSON dump of entity records loaded into a read-only tier.
    pub preload_path: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            node_capacity: defaults::DEFAULT_NODE_CACHE_CAPACITY,
            node_idle_secs: defaults::DEFAULT_NODE_CACHE_IDLE_SECS,
            region_capacity: defaults::DEFAULT_REGION_CACHE_CAPACITY,
            preload_path: None,
        }
    }
}
