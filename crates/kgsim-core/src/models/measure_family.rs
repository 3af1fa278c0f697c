use serde::{Deserialize, Serialize};

/// Coarse grouping used by the weighted composite measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureFamily {
    /// Cosine over a learned vector space.
    Embedding,
    /// Class membership or ontology distance.
    Ontology,
    /// Combination of other measures.
    Composite,
    /// Neighborhood-expansion measures built on top-similarity regions.
    Region,
}
