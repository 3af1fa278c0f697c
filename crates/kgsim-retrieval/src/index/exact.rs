use kgsim_core::errors::IndexResult;
use kgsim_core::traits::IVectorIndex;
use kgsim_core::{EmbeddingKind, EntityId};
use kgsim_observability::events;
use rayon::prelude::*;

use super::IndexedVectors;

/// Scans above this size run in parallel.
const PARALLEL_SCAN: usize = 4_096;

/// Exhaustive squared-L2 search. Ties are broken by entity id, so results are
/// fully deterministic.
pub struct ExactIndex {
    kind: EmbeddingKind,
    inner: IndexedVectors,
}

impl ExactIndex {
    pub fn build(kind: EmbeddingKind, entries: Vec<(EntityId, Vec<f32>)>) -> IndexResult<Self> {
        let inner = IndexedVectors::prepare(entries)?;
        events::index_built(kind.as_str(), inner.ids.len(), inner.dimensions);
        Ok(Self { kind, inner })
    }

    pub fn kind(&self) -> EmbeddingKind {
        self.kind
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl IVectorIndex for ExactIndex {
    fn dimensions(&self) -> usize {
        self.inner.dimensions
    }

    fn search(&self, query: &[f32], k: usize) -> IndexResult<Vec<(EntityId, f32)>> {
        self.inner.check_query(query)?;
        if k == 0 {
            return Ok(Vec::new());
        }
        let mut scored: Vec<(usize, f32)> = if self.inner.vectors.len() >= PARALLEL_SCAN {
            self.inner
                .vectors
                .par_iter()
                .enumerate()
                .map(|(i, v)| (i, squared_l2(query, v)))
                .collect()
        } else {
            self.inner
                .vectors
                .iter()
                .enumerate()
                .map(|(i, v)| (i, squared_l2(query, v)))
                .collect()
        };
        scored.sort_by(|(ia, da), (ib, db)| {
            da.total_cmp(db)
                .then_with(|| self.inner.ids[*ia].cmp(&self.inner.ids[*ib]))
        });
        scored.truncate(k);
        Ok(scored
            .into_iter()
            .map(|(i, d)| (self.inner.ids[i].clone(), d))
            .collect())
    }

    fn vector(&self, entity: &str) -> Option<Vec<f32>> {
        self.inner.vector(entity)
    }

    fn len(&self) -> usize {
        self.inner.ids.len()
    }
}
