use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::BackendResult;
use crate::models::{EmbeddingKind, EntityId};
use crate::ontology;

/// Read access to the knowledge graph: labels, embeddings, class counts and
/// one-hop ontology edges.
///
/// Implementations are only required to be `Send`. A raw connection is not
/// assumed to tolerate concurrent use; the cache layer serializes access to it
/// through a worker pool.
pub trait IKnowledgeGraph: Send {
    /// Preferred label of an entity.
    fn label(&self, entity: &str) -> BackendResult<Option<String>>;

    /// Embedding of one entity under one embedding kind.
    fn embedding(&self, entity: &str, kind: EmbeddingKind) -> BackendResult<Option<Vec<f32>>>;

    /// Positional bulk form of [`IKnowledgeGraph::embedding`]: same length as
    /// `entities`, `None` for misses.
    fn embeddings(
        &self,
        entities: &[EntityId],
        kind: EmbeddingKind,
    ) -> BackendResult<Vec<Option<Vec<f32>>>> {
        entities.iter().map(|e| self.embedding(e, kind)).collect()
    }

    /// Transitive instance count of a class, 0 if unknown.
    fn class_count(&self, class: &str) -> BackendResult<u64>;

    /// Packed `class:count|class:count|...` membership string.
    fn class_counts_compact(&self, entity: &str) -> BackendResult<Option<String>>;

    /// Direct (one-hop) ontology parents.
    fn ancestors(&self, entity: &str) -> BackendResult<HashSet<EntityId>>;

    /// Direct (one-hop) ontology children.
    fn descendants(&self, entity: &str) -> BackendResult<HashSet<EntityId>>;

    /// Most specific common subsumers of two classes.
    ///
    /// The default resolves them locally from one-hop ancestor queries;
    /// backends with a native query should override it.
    fn most_specific_subsumers(&self, c1: &str, c2: &str) -> BackendResult<HashSet<EntityId>> {
        ontology::most_specific_subsumers(c1, c2, |c| self.ancestors(c))
    }
}

/// Thread-safe handle to a knowledge graph, as handed to measures.
pub type SharedGraph = Arc<dyn IKnowledgeGraph + Sync>;
