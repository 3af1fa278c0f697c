//! Cosine similarity over one embedding family, with ANN-assisted top-k.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use kgsim_cache::{FieldScope, NodeStore};
use kgsim_core::config::RetrievalConfig;
use kgsim_core::errors::{MeasureError, MeasureResult};
use kgsim_core::models::entity::sort_ranked;
use kgsim_core::models::{EmbeddingKind, EntityId, MeasureFamily, ScoredEntity};
use kgsim_core::traits::similarity_measure::degrade;
use kgsim_core::traits::{ISimilarityMeasure, IVectorIndex};
use kgsim_observability::events;
use rayon::prelude::*;
use tracing::debug;

use crate::cosine::{unit_similarity, unit_vector};

/// Embedding similarity for one [`EmbeddingKind`].
///
/// Missing embeddings score 0.0. Top-k needs a vector index; without one the
/// measure returns no neighbors.
pub struct EmbeddingMeasure {
    kind: EmbeddingKind,
    store: Arc<NodeStore>,
    index: Option<Arc<dyn IVectorIndex>>,
    retrieval: RetrievalConfig,
}

impl EmbeddingMeasure {
    pub fn new(kind: EmbeddingKind, store: Arc<NodeStore>) -> Self {
        Self {
            kind,
            store,
            index: None,
            retrieval: RetrievalConfig::default(),
        }
    }

    pub fn with_index(mut self, index: Arc<dyn IVectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.retrieval = retrieval;
        self
    }

    pub fn kind(&self) -> EmbeddingKind {
        self.kind
    }

    pub fn index(&self) -> Option<&Arc<dyn IVectorIndex>> {
        self.index.as_ref()
    }

    fn unit(&self, entity: &str) -> MeasureResult<Option<Vec<f64>>> {
        Ok(self
            .store
            .embedding(entity, self.kind)?
            .and_then(|v| unit_vector(&v)))
    }

    /// Unit vectors of the given entities, normalized once each. Entities
    /// without a usable embedding are left out.
    fn units(&self, entities: &[EntityId]) -> HashMap<EntityId, Vec<f64>> {
        let vectors = self.store.embeddings(entities, self.kind);
        entities
            .iter()
            .zip(vectors)
            .filter_map(|(e, v)| v.and_then(|v| unit_vector(&v)).map(|u| (e.clone(), u)))
            .collect()
    }

    fn score_all<T, F>(&self, items: &[T], score: F) -> Vec<f64>
    where
        T: Sync,
        F: Fn(&T) -> f64 + Sync + Send,
    {
        if items.len() >= self.retrieval.parallel_threshold {
            items.par_iter().map(score).collect()
        } else {
            items.iter().map(score).collect()
        }
    }

    /// Top-k with an explicit candidate pool size.
    ///
    /// Stage 1 asks the index for `pool + 1` neighbors (the query entity
    /// comes back as its own nearest hit). Stage 2 drops the self-match and
    /// duplicates, re-scores the pool with exact cosine in one batch, sorts
    /// and truncates to `k`.
    pub fn top_k_with_pool(&self, a: &str, k: usize, pool: usize) -> MeasureResult<Vec<ScoredEntity>> {
        let Some(index) = &self.index else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }
        let query: Vec<f32> = match self.store.embedding(a, self.kind)? {
            Some(v) => v.to_vec(),
            None => index.vector(a).ok_or_else(|| MeasureError::MissingEntity {
                entity: a.to_string(),
                field: FieldScope::Embedding(self.kind).to_string(),
            })?,
        };

        let hits = index.search(&query, pool.max(k).saturating_add(1))?;
        let mut seen: HashSet<EntityId> = HashSet::new();
        let candidates: Vec<EntityId> = hits
            .into_iter()
            .map(|(entity, _)| entity)
            .filter(|entity| entity != a && seen.insert(entity.clone()))
            .collect();
        debug!(measure = self.name(), entity = a, candidates = candidates.len(), "ann candidates");

        let scores = self.similarity_to_many(a, &candidates);
        let pool_len = candidates.len();
        let mut ranked: Vec<ScoredEntity> = candidates
            .into_iter()
            .zip(scores)
            .map(|(entity, score)| ScoredEntity::new(entity, score))
            .collect();
        sort_ranked(&mut ranked);
        ranked.truncate(k);
        events::top_k_completed(self.name(), a, pool_len, ranked.len());
        Ok(ranked)
    }
}

impl ISimilarityMeasure for EmbeddingMeasure {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    fn family(&self) -> MeasureFamily {
        MeasureFamily::Embedding
    }

    fn similarity(&self, a: &str, b: &str) -> MeasureResult<f64> {
        let Some(ua) = self.unit(a)? else {
            return Ok(0.0);
        };
        let Some(ub) = self.unit(b)? else {
            return Ok(0.0);
        };
        Ok(unit_similarity(&ua, &ub))
    }

    /// Fetches every distinct entity once, then scores all pairs from the
    /// normalized vectors.
    fn batch_similarity(&self, pairs: &[(EntityId, EntityId)]) -> Vec<f64> {
        let mut seen: HashSet<&str> = HashSet::new();
        let distinct: Vec<EntityId> = pairs
            .iter()
            .flat_map(|(a, b)| [a, b])
            .filter(|e| seen.insert(e.as_str()))
            .cloned()
            .collect();
        let units = self.units(&distinct);
        self.score_all(pairs, |(a, b)| match (units.get(a), units.get(b)) {
            (Some(ua), Some(ub)) => unit_similarity(ua, ub),
            _ => 0.0,
        })
    }

    /// Missing others are scored against the antiparallel of `a`'s vector,
    /// which clamps to 0.0, so every slot goes through the same dot product.
    fn similarity_to_many(&self, a: &str, others: &[EntityId]) -> Vec<f64> {
        let ua = match self.unit(a) {
            Ok(Some(u)) => u,
            Ok(None) => return vec![0.0; others.len()],
            Err(e) => {
                degrade(self.name(), a, "*", &e);
                return vec![0.0; others.len()];
            }
        };
        let placeholder: Vec<f64> = ua.iter().map(|x| -x).collect();
        let rows: Vec<Option<Vec<f64>>> = self
            .store
            .embeddings(others, self.kind)
            .into_iter()
            .map(|v| v.and_then(|v| unit_vector(&v)))
            .collect();
        self.score_all(&rows, |row| {
            unit_similarity(&ua, row.as_deref().unwrap_or(placeholder.as_slice()))
        })
    }

    fn missing_inputs(&self, entities: &[&str]) -> MeasureResult<Vec<EntityId>> {
        let mut missing = Vec::new();
        for entity in entities {
            if self.store.embedding(entity, self.kind)?.is_none() {
                missing.push(entity.to_string());
            }
        }
        Ok(missing)
    }

    fn top_k(&self, a: &str, k: usize) -> MeasureResult<Vec<ScoredEntity>> {
        self.top_k_with_pool(a, k, self.retrieval.pool_size(k))
    }
}
