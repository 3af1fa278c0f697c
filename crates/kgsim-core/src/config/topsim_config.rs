use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::EmbeddingKind;

/// Neighborhood-expansion ("top-similarity region") configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TopSimConfig {
    /// Ontology up-hops for candidate generation.
    pub max_up: usize,
    /// Ontology down-hops from the node and its ancestors.
    pub max_down: usize,
    /// Region size (top-n of the candidate pool).
    pub top_n: usize,
    /// Neighbors taken from each embedding family's ANN retrieval.
    pub first_n: usize,
    /// Region members per side used by the blended measure.
    pub k: usize,
    /// Composite measure that scores the candidate pool.
    pub measure: String,
    /// Embedding families consulted for ANN candidates, in order.
    pub embedding_families: Vec<EmbeddingKind>,
}

impl Default for TopSimConfig {
    fn default() -> Self {
        Self {
            max_up: defaults::DEFAULT_TOPSIM_MAX_UP,
            max_down: defaults::DEFAULT_TOPSIM_MAX_DOWN,
            top_n: defaults::DEFAULT_TOPSIM_TOP_N,
            first_n: defaults::DEFAULT_TOPSIM_FIRST_N,
            k: defaults::DEFAULT_TOPSIM_BLEND_K,
            measure: defaults::DEFAULT_TOPSIM_MEASURE.to_string(),
            embedding_families: vec![EmbeddingKind::Complex, EmbeddingKind::Node2vec],
        }
    }
}
