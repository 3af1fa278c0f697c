use serde::{Deserialize, Serialize};

use super::defaults;

/// ANN-assisted top-k retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Candidate pool size as a multiple of k.
    pub pool_factor: usize,
    /// k used when the caller does not give one.
    pub default_k: usize,
    /// HNSW search depth, fixed at index load.
    pub ef_search: usize,
    /// HNSW max connections per layer.
    pub hnsw_max_connections: usize,
    /// HNSW construction search width.
    pub hnsw_ef_construction: usize,
    /// Pair count above which cosine batches are scored in parallel.
    pub parallel_threshold: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            pool_factor: defaults::DEFAULT_POOL_FACTOR,
            default_k: defaults::DEFAULT_TOP_K,
            ef_search: defaults::DEFAULT_EF_SEARCH,
            hnsw_max_connections: defaults::DEFAULT_HNSW_MAX_CONNECTIONS,
            hnsw_ef_construction: defaults::DEFAULT_HNSW_EF_CONSTRUCTION,
            parallel_threshold: defaults::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl RetrievalConfig {
    /// Pool size for a top-k request.
    pub fn pool_size(&self, k: usize) -> usize {
        k.saturating_mul(self.pool_factor).max(k)
    }
}
