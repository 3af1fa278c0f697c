pub mod knowledge_graph;
pub mod path_backend;
pub mod similarity_measure;
pub mod vector_index;

pub use knowledge_graph::{IKnowledgeGraph, SharedGraph};
pub use path_backend::IPathBackend;
pub use similarity_measure::ISimilarityMeasure;
pub use vector_index::IVectorIndex;
