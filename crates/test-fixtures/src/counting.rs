//! Backend wrapper that counts calls per method, for cache-effect assertions.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use kgsim_core::errors::BackendResult;
use kgsim_core::traits::IKnowledgeGraph;
use kgsim_core::{EmbeddingKind, EntityId};

/// Wraps a backend and counts every call by method name. Clones share the
/// counters, so a clone handed to a worker pool still reports to the test.
#[derive(Debug, Clone)]
pub struct CountingGraph<G> {
    inner: G,
    calls: Arc<DashMap<&'static str, usize>>,
}

impl<G> CountingGraph<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            calls: Arc::new(DashMap::new()),
        }
    }

    /// Calls made to `method` so far.
    pub fn calls(&self, method: &str) -> usize {
        self.calls.get(method).map(|c| *c).unwrap_or(0)
    }

    /// Calls made to every method so far.
    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|e| *e.value()).sum()
    }

    pub fn reset(&self) {
        self.calls.clear();
    }

    fn record(&self, method: &'static str) {
        *self.calls.entry(method).or_insert(0) += 1;
    }
}

impl<G: IKnowledgeGraph> IKnowledgeGraph for CountingGraph<G> {
    fn label(&self, entity: &str) -> BackendResult<Option<String>> {
        self.record("label");
        self.inner.label(entity)
    }

    fn embedding(&self, entity: &str, kind: EmbeddingKind) -> BackendResult<Option<Vec<f32>>> {
        self.record("embedding");
        self.inner.embedding(entity, kind)
    }

    fn embeddings(
        &self,
        entities: &[EntityId],
        kind: EmbeddingKind,
    ) -> BackendResult<Vec<Option<Vec<f32>>>> {
        self.record("embeddings");
        self.inner.embeddings(entities, kind)
    }

    fn class_count(&self, class: &str) -> BackendResult<u64> {
        self.record("class_count");
        self.inner.class_count(class)
    }

    fn class_counts_compact(&self, entity: &str) -> BackendResult<Option<String>> {
        self.record("class_counts_compact");
        self.inner.class_counts_compact(entity)
    }

    fn ancestors(&self, entity: &str) -> BackendResult<HashSet<EntityId>> {
        self.record("ancestors");
        self.inner.ancestors(entity)
    }

    fn descendants(&self, entity: &str) -> BackendResult<HashSet<EntityId>> {
        self.record("descendants");
        self.inner.descendants(entity)
    }

    fn most_specific_subsumers(&self, c1: &str, c2: &str) -> BackendResult<HashSet<EntityId>> {
        self.record("most_specific_subsumers");
        self.inner.most_specific_subsumers(c1, c2)
    }
}
