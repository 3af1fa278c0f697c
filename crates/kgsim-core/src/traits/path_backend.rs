use crate::errors::BackendResult;
use crate::models::EntityId;

/// Bounded-hop path enumeration between two graph nodes.
pub trait IPathBackend: Send + Sync {
    /// All simple paths from `source` to `target` with at most `max_hops`
    /// edges, each as the sequence of node/edge ids along the path.
    fn paths(
        &self,
        source: &str,
        target: &str,
        max_hops: usize,
    ) -> BackendResult<Vec<Vec<EntityId>>>;
}
