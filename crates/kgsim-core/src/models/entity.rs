use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Opaque graph node identifier. Only identity and equality are assumed.
pub type EntityId = String;

/// An entity with a similarity score relative to some query entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntity {
    pub entity: EntityId,
    pub score: f64,
}

impl ScoredEntity {
    pub fn new(entity: impl Into<EntityId>, score: f64) -> Self {
        Self {
            entity: entity.into(),
            score,
        }
    }

    /// Descending by score, ties broken by ascending entity id so rankings
    /// are deterministic regardless of candidate order.
    pub fn rank_order(a: &Self, b: &Self) -> Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.entity.cmp(&b.entity))
    }
}

/// Sort scored entities best-first (see [`ScoredEntity::rank_order`]).
pub fn sort_ranked(entities: &mut [ScoredEntity]) {
    entities.sort_by(ScoredEntity::rank_order);
}
