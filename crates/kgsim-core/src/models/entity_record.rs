use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ClassMembership, EmbeddingKind, EntityId};

/// Per-entity payload fetched from the knowledge graph backend.
///
/// Absent fields mean "not available for this entity". That is a valid
/// terminal state, not an error. Records are frozen once cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub embeddings: BTreeMap<EmbeddingKind, Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<ClassMembership>,
}

impl EntityRecord {
    pub fn new(entity: impl Into<EntityId>) -> Self {
        Self {
            entity: entity.into(),
            ..Default::default()
        }
    }

    pub fn embedding(&self, kind: EmbeddingKind) -> Option<&[f32]> {
        self.embeddings.get(&kind).map(Vec::as_slice)
    }

    /// True when no field at all is available.
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.embeddings.is_empty() && self.classes.is_none()
    }
}
