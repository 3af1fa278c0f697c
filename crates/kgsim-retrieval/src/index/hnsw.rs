use hnsw_rs::prelude::{DistL2, Hnsw};
use kgsim_core::config::RetrievalConfig;
use kgsim_core::errors::IndexResult;
use kgsim_core::traits::IVectorIndex;
use kgsim_core::{EmbeddingKind, EntityId};
use kgsim_observability::events;
use tracing::debug;

use super::IndexedVectors;

/// HNSW graph over one embedding space, L2 metric.
///
/// Search depth is taken from the config at build time and never changes, so
/// concurrent searches share the graph without locking.
pub struct HnswIndex {
    kind: EmbeddingKind,
    inner: IndexedVectors,
    ef_search: usize,
    hnsw: Hnsw<'static, f32, DistL2>,
}

impl HnswIndex {
    pub fn build(
        kind: EmbeddingKind,
        entries: Vec<(EntityId, Vec<f32>)>,
        config: &RetrievalConfig,
    ) -> IndexResult<Self> {
        let inner = IndexedVectors::prepare(entries)?;
        let nb_elem = inner.ids.len();
        let max_layer = 16.min((nb_elem as f32).ln().trunc() as usize).max(1);
        let hnsw = Hnsw::<f32, DistL2>::new(
            config.hnsw_max_connections.max(2),
            nb_elem,
            max_layer,
            config.hnsw_ef_construction.max(1),
            DistL2 {},
        );
        for (i, v) in inner.vectors.iter().enumerate() {
            hnsw.insert((&v[..], i));
        }
        debug!(kind = kind.as_str(), max_layer, "hnsw graph built");
        events::index_built(kind.as_str(), nb_elem, inner.dimensions);
        Ok(Self {
            kind,
            inner,
            ef_search: config.ef_search,
            hnsw,
        })
    }

    pub fn kind(&self) -> EmbeddingKind {
        self.kind
    }
}

impl IVectorIndex for HnswIndex {
    fn dimensions(&self) -> usize {
        self.inner.dimensions
    }

    fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<(EntityId, f32)>> {
        self.inner.check_query(query)?;
        if k == 0 {
            return Ok(Vec::new());
        }
        let neighbours = self.hnsw.search(query, k, self.ef_search.max(k));
        Ok(neighbours
            .into_iter()
            .filter_map(|n| self.inner.ids.get(n.d_id).map(|id| (id.clone(), n.distance)))
            .collect())
    }

    fn vector(&self, entity: &str) -> Option<Vec<f32>> {
        self.inner.vector(entity)
    }

    fn len(&self) -> usize {
        self.inner.ids.len()
    }
}
