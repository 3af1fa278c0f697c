//! Candidate pools for top-similarity regions.
//!
//! Stage 1 of region computation: ontology neighbors of the node unioned with
//! the ANN-assisted top-N of each configured embedding family.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use kgsim_cache::NodeStore;
use kgsim_core::config::TopSimConfig;
use kgsim_core::errors::{MeasureError, MeasureResult};
use kgsim_core::{EmbeddingKind, EntityId};
use kgsim_measures::MeasureRef;
use tracing::debug;

pub struct CandidateGenerator {
    store: Arc<NodeStore>,
    retrievers: BTreeMap<EmbeddingKind, MeasureRef>,
}

impl CandidateGenerator {
    pub fn new(store: Arc<NodeStore>) -> Self {
        Self {
            store,
            retrievers: BTreeMap::new(),
        }
    }

    /// Register the measure whose `top_k` supplies ANN candidates for `kind`.
    pub fn with_retriever(mut self, kind: EmbeddingKind, measure: MeasureRef) -> Self {
        self.retrievers.insert(kind, measure);
        self
    }

    /// Candidate pool of `node`, sorted by id, never containing `node`.
    ///
    /// An embedding family with no registered retriever, or in which `node`
    /// has no vector, contributes nothing. Backend failures fail the pool.
    pub fn candidates(&self, node: &str, config: &TopSimConfig) -> MeasureResult<Vec<EntityId>> {
        let mut pool: BTreeSet<EntityId> = self
            .store
            .neighbors(node, config.max_up, config.max_down)?
            .into_iter()
            .collect();
        let ontology = pool.len();

        for kind in &config.embedding_families {
            let Some(retriever) = self.retrievers.get(kind) else {
                debug!(kind = kind.as_str(), "no retriever for embedding family");
                continue;
            };
            match retriever.top_k(node, config.first_n) {
                Ok(hits) => pool.extend(hits.into_iter().map(|h| h.entity)),
                Err(MeasureError::MissingEntity { .. }) => {
                    debug!(node, kind = kind.as_str(), "node has no vector, skipping family");
                }
                Err(e) => return Err(e),
            }
        }

        pool.remove(node);
        debug!(node, ontology, total = pool.len(), "candidate pool generated");
        Ok(pool.into_iter().collect())
    }
}
