use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::ROOT_CLASS;

/// How Jiang-Conrath combines several most-specific subsumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsumerAggregation {
    /// Best single subsumer.
    #[default]
    Max,
    /// `1 / sum(1 / dist_i)` over all subsumers.
    ParallelResistor,
}

/// Ontology measure configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologyConfig {
    /// Reference class whose transitive count is `N`.
    pub root_class: String,
    /// Count assumed for a class the backend has no count for.
    pub default_class_count: u64,
    pub subsumer_aggregation: SubsumerAggregation,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            root_class: ROOT_CLASS.to_string(),
            default_class_count: defaults::DEFAULT_DEFAULT_CLASS_COUNT,
            subsumer_aggregation: SubsumerAggregation::default(),
        }
    }
}
