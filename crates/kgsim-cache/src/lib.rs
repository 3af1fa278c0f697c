//! # kgsim-cache
//!
//! Everything between the measures and the knowledge graph backend:
//! a tiered per-node cache behind the `INodeCache` seam (preloaded tier, then
//! a bounded moka tier), a memo cache for derived results, a worker pool that
//! serializes access to non-thread-safe backend connections, and `NodeStore`,
//! the cache-fronted view the measures read from.

pub mod backend_pool;
pub mod keys;
pub mod memo;
pub mod node_cache;
pub mod node_store;

pub use backend_pool::BackendPool;
pub use keys::{CachedField, FieldScope, NodeKey};
pub use memo::MemoCache;
pub use node_cache::{
    CacheHitTier, CacheStats, INodeCache, L1MemoryCache, NoopNodeCache, PreloadedTier,
    TieredNodeCache,
};
pub use node_store::NodeStore;
