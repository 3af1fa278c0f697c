//! Golden graph loader.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use kgsim_core::{ClassMembership, EmbeddingKind, EntityRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::memory_graph::InMemoryKnowledgeGraph;
use crate::paths::InMemoryPathBackend;

/// Absolute path of a file under this crate's `graphs/` directory.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("graphs")
        .join(relative_path)
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenEntity {
    pub entity: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub embeddings: BTreeMap<EmbeddingKind, Vec<f32>>,
    /// Packed `class:count|...` membership.
    #[serde(default)]
    pub classes: Option<String>,
}

/// A small knowledge graph with its expected similarity values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenGraph {
    pub description: String,
    pub root: String,
    pub entities: Vec<GoldenEntity>,
    pub class_counts: HashMap<String, u64>,
    /// `[child, parent]` subclass edges.
    pub subclass_of: Vec<(String, String)>,
    /// Expected scores: `measure -> "a|b" -> score`.
    #[serde(default)]
    pub expected: HashMap<String, HashMap<String, f64>>,
}

impl GoldenGraph {
    pub fn knowledge_graph(&self) -> InMemoryKnowledgeGraph {
        let mut builder = InMemoryKnowledgeGraph::builder();
        for e in &self.entities {
            if let Some(label) = &e.label {
                builder = builder.label(&e.entity, label);
            }
            for (kind, vector) in &e.embeddings {
                builder = builder.embedding(&e.entity, *kind, vector.clone());
            }
            if let Some(classes) = &e.classes {
                builder = builder.compact_classes(&e.entity, classes);
            }
        }
        for (class, count) in &self.class_counts {
            builder = builder.class_count(class, *count);
        }
        for (child, parent) in &self.subclass_of {
            builder = builder.subclass(child, parent);
        }
        builder.build()
    }

    pub fn path_backend(&self) -> InMemoryPathBackend {
        let edges: Vec<(&str, &str)> = self
            .subclass_of
            .iter()
            .map(|(c, p)| (c.as_str(), p.as_str()))
            .collect();
        InMemoryPathBackend::from_edges(&edges)
    }

    /// The entities as cache records, e.g. for a preload dump.
    pub fn records(&self) -> Vec<EntityRecord> {
        self.entities
            .iter()
            .map(|e| EntityRecord {
                entity: e.entity.clone(),
                label: e.label.clone(),
                embeddings: e.embeddings.clone(),
                classes: e.classes.as_deref().map(ClassMembership::parse_compact),
            })
            .collect()
    }

    pub fn entity_ids(&self) -> Vec<String> {
        self.entities.iter().map(|e| e.entity.clone()).collect()
    }

    /// Expected score of `(a, b)` under `measure`, if recorded.
    pub fn expected_score(&self, measure: &str, a: &str, b: &str) -> Option<f64> {
        self.expected.get(measure)?.get(&format!("{a}|{b}")).copied()
    }
}

/// The animals-and-vehicles golden graph.
pub fn golden_graph() -> GoldenGraph {
    load_fixture("animals_vehicles.json")
}
