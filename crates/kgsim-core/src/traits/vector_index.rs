use crate::errors::IndexResult;
use crate::models::EntityId;

/// Approximate k-nearest-neighbor search over one embedding space.
///
/// Read-only after load; search parameters are fixed at build time, so
/// concurrent reads need no coordination.
pub trait IVectorIndex: Send + Sync {
    /// Vector dimension of the indexed space.
    fn dimensions(&self) -> usize;

    /// Up to `k` neighbors of `query`, ordered by the index's internal metric
    /// (best first), with the index's raw score. When `query` is an indexed
    /// entity's own vector, that entity comes back first.
    fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<(EntityId, f32)>>;

    /// Reconstruct the stored vector of an indexed entity.
    fn vector(&self, entity: &str) -> Option<Vec<f32>>;

    /// Number of indexed entities.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
