//! Vector index adapters behind [`IVectorIndex`](kgsim_core::traits::IVectorIndex).
//!
//! - [`ExactIndex`]: exhaustive squared-L2 scan. Deterministic.
//! - [`HnswIndex`]: `hnsw_rs` graph, parameters fixed at build time.
//!
//! Both are read-only once built.

pub mod exact;
pub mod hnsw;

use std::collections::HashMap;

use kgsim_cache::NodeStore;
use kgsim_core::errors::{IndexError, IndexResult};
use kgsim_core::{EmbeddingKind, EntityId};

pub use exact::ExactIndex;
pub use hnsw::HnswIndex;

/// Indexable `(entity, vector)` entries for `entities` under `kind`, read
/// through the node cache. Entities without an embedding are skipped.
pub fn entries_from_store(
    store: &NodeStore,
    entities: &[EntityId],
    kind: EmbeddingKind,
) -> Vec<(EntityId, Vec<f32>)> {
    entities
        .iter()
        .zip(store.embeddings(entities, kind))
        .filter_map(|(entity, vector)| vector.map(|v| (entity.clone(), v.to_vec())))
        .collect()
}

/// Validated, de-duplicated index contents shared by both adapters.
pub(crate) struct IndexedVectors {
    pub ids: Vec<EntityId>,
    pub vectors: Vec<Vec<f32>>,
    pub positions: HashMap<EntityId, usize>,
    pub dimensions: usize,
}

impl IndexedVectors {
    /// Every vector must share the first entry's dimension. Repeated ids keep
    /// their first vector.
    pub fn prepare(entries: Vec<(EntityId, Vec<f32>)>) -> IndexResult<Self> {
        let dimensions = match entries.first() {
            Some((_, v)) if !v.is_empty() => v.len(),
            Some(_) => {
                return Err(IndexError::BuildFailed {
                    reason: "zero-dimensional vectors".to_string(),
                })
            }
            None => {
                return Err(IndexError::BuildFailed {
                    reason: "no vectors to index".to_string(),
                })
            }
        };
        let mut out = Self {
            ids: Vec::with_capacity(entries.len()),
            vectors: Vec::with_capacity(entries.len()),
            positions: HashMap::with_capacity(entries.len()),
            dimensions,
        };
        for (entity, vector) in entries {
            if vector.len() != dimensions {
                return Err(IndexError::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
            if out.positions.contains_key(&entity) {
                continue;
            }
            out.positions.insert(entity.clone(), out.ids.len());
            out.ids.push(entity);
            out.vectors.push(vector);
        }
        Ok(out)
    }

    pub fn check_query(&self, query: &[f32]) -> IndexResult<()> {
        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }
        Ok(())
    }

    pub fn vector(&self, entity: &str) -> Option<Vec<f32>> {
        self.positions.get(entity).map(|&i| self.vectors[i].clone())
    }
}
