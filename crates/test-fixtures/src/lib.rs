//! Test fixtures for kgsim: an in-memory knowledge graph backed by a petgraph
//! ontology, a call-counting backend wrapper, an in-memory path backend, and
//! loaders for the JSON golden graphs under `graphs/`.

pub mod counting;
pub mod golden;
pub mod memory_graph;
pub mod paths;

pub use counting::CountingGraph;
pub use golden::{fixture_path, golden_graph, load_fixture, GoldenEntity, GoldenGraph};
pub use memory_graph::{InMemoryKnowledgeGraph, InMemoryKnowledgeGraphBuilder};
pub use paths::InMemoryPathBackend;
