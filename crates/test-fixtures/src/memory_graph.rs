//! In-memory knowledge graph. Ontology edges live in a petgraph
//! `StableDiGraph` pointing child -> parent; everything else is plain maps.

use std::collections::{HashMap, HashSet};

use kgsim_core::errors::{BackendError, BackendResult};
use kgsim_core::traits::IKnowledgeGraph;
use kgsim_core::{EmbeddingKind, EntityId};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;

/// Ontology graph with an id -> node index lookup.
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    pub graph: StableDiGraph<EntityId, ()>,
    pub node_index: HashMap<EntityId, NodeIndex>,
}

impl OntologyGraph {
    pub fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(idx) = self.node_index.get(id) {
            return *idx;
        }
        let idx = self.graph.add_node(id.to_string());
        self.node_index.insert(id.to_string(), idx);
        idx
    }

    pub fn add_subclass(&mut self, child: &str, parent: &str) {
        let c = self.ensure_node(child);
        let p = self.ensure_node(parent);
        if self.graph.find_edge(c, p).is_none() {
            self.graph.add_edge(c, p, ());
        }
    }

    fn one_hop(&self, id: &str, direction: Direction) -> HashSet<EntityId> {
        let Some(idx) = self.node_index.get(id) else {
            return HashSet::new();
        };
        self.graph
            .neighbors_directed(*idx, direction)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect()
    }
}

/// Deterministic [`IKnowledgeGraph`] for tests.
///
/// Entities listed via [`InMemoryKnowledgeGraphBuilder::failing_entity`] make
/// every lookup touching them fail with `BackendError::Unavailable`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeGraph {
    labels: HashMap<EntityId, String>,
    embeddings: HashMap<(EntityId, EmbeddingKind), Vec<f32>>,
    class_counts: HashMap<EntityId, u64>,
    compact_classes: HashMap<EntityId, String>,
    ontology: OntologyGraph,
    failing: HashSet<EntityId>,
}

impl InMemoryKnowledgeGraph {
    pub fn builder() -> InMemoryKnowledgeGraphBuilder {
        InMemoryKnowledgeGraphBuilder::default()
    }

    pub fn ontology(&self) -> &OntologyGraph {
        &self.ontology
    }

    fn check(&self, entity: &str) -> BackendResult<()> {
        if self.failing.contains(entity) {
            return Err(BackendError::Unavailable {
                reason: format!("lookup of {entity} failed"),
            });
        }
        Ok(())
    }
}

impl IKnowledgeGraph for InMemoryKnowledgeGraph {
    fn label(&self, entity: &str) -> BackendResult<Option<String>> {
        self.check(entity)?;
        Ok(self.labels.get(entity).cloned())
    }

    fn embedding(&self, entity: &str, kind: EmbeddingKind) -> BackendResult<Option<Vec<f32>>> {
        self.check(entity)?;
        Ok(self.embeddings.get(&(entity.to_string(), kind)).cloned())
    }

    fn class_count(&self, class: &str) -> BackendResult<u64> {
        self.check(class)?;
        Ok(self.class_counts.get(class).copied().unwrap_or(0))
    }

    fn class_counts_compact(&self, entity: &str) -> BackendResult<Option<String>> {
        self.check(entity)?;
        Ok(self.compact_classes.get(entity).cloned())
    }

    fn ancestors(&self, entity: &str) -> BackendResult<HashSet<EntityId>> {
        self.check(entity)?;
        Ok(self.ontology.one_hop(entity, Direction::Outgoing))
    }

    fn descendants(&self, entity: &str) -> BackendResult<HashSet<EntityId>> {
        self.check(entity)?;
        Ok(self.ontology.one_hop(entity, Direction::Incoming))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryKnowledgeGraphBuilder {
    graph: InMemoryKnowledgeGraph,
}

impl InMemoryKnowledgeGraphBuilder {
    pub fn label(mut self, entity: &str, label: &str) -> Self {
        self.graph.labels.insert(entity.to_string(), label.to_string());
        self
    }

    pub fn embedding(mut self, entity: &str, kind: EmbeddingKind, vector: Vec<f32>) -> Self {
        self.graph.embeddings.insert((entity.to_string(), kind), vector);
        self
    }

    pub fn class_count(mut self, class: &str, count: u64) -> Self {
        self.graph.class_counts.insert(class.to_string(), count);
        self
    }

    /// Packed membership string, stored verbatim.
    pub fn compact_classes(mut self, entity: &str, packed: &str) -> Self {
        self.graph
            .compact_classes
            .insert(entity.to_string(), packed.to_string());
        self
    }

    /// Membership built from `(class, count)` pairs.
    pub fn classes(self, entity: &str, classes: &[(&str, u64)]) -> Self {
        let packed = classes
            .iter()
            .map(|(c, n)| format!("{c}:{n}"))
            .collect::<Vec<_>>()
            .join("|");
        self.compact_classes(entity, &packed)
    }

    pub fn subclass(mut self, child: &str, parent: &str) -> Self {
        self.graph.ontology.add_subclass(child, parent);
        self
    }

    pub fn failing_entity(mut self, entity: &str) -> Self {
        self.graph.failing.insert(entity.to_string());
        self
    }

    pub fn build(self) -> InMemoryKnowledgeGraph {
        self.graph
    }
}
