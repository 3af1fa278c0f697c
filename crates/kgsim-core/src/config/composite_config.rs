use serde::{Deserialize, Serialize};

use super::defaults;

/// Weights of one embedding/ontology split measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedSplitConfig {
    pub embedding_weight: f64,
    pub ontology_weight: f64,
}

impl WeightedSplitConfig {
    pub fn new((embedding_weight, ontology_weight): (f64, f64)) -> Self {
        Self {
            embedding_weight,
            ontology_weight,
        }
    }
}

/// Composite measure configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Children of the mean combination, by registry name.
    pub mean_members: Vec<String>,
    /// Embedding-family children of the split measures.
    pub embedding_members: Vec<String>,
    /// Ontology-family children of the split measures.
    pub ontology_members: Vec<String>,
    /// Weights of the split measure that maxes ontology scores.
    pub max_split: WeightedSplitConfig,
    /// Weights of the split measure that averages ontology scores.
    pub mean_split: WeightedSplitConfig,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        let names = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            mean_members: names(&["complex", "transe", "text", "class", "jc"]),
            embedding_members: names(&["complex", "transe", "text"]),
            ontology_members: names(&["class", "jc"]),
            max_split: WeightedSplitConfig::new(defaults::DEFAULT_MAX_SPLIT_WEIGHTS),
            mean_split: WeightedSplitConfig::new(defaults::DEFAULT_MEAN_SPLIT_WEIGHTS),
        }
    }
}
