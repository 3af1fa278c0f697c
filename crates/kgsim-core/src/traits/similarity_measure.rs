use tracing::debug;

use crate::errors::MeasureResult;
use crate::models::{EntityId, MeasureFamily, ScoredEntity};

/// A named similarity scoring strategy.
///
/// Every score is in `[0, 1]`: 1 means identical, 0 means unrelated or not
/// computable. Errors are pairwise: the bulk forms score a failed pair as 0.0
/// and keep going.
pub trait ISimilarityMeasure: Send + Sync {
    /// Registry name, e.g. `"complex"` or `"jc"`.
    fn name(&self) -> &str;

    fn family(&self) -> MeasureFamily;

    /// Score one pair.
    fn similarity(&self, a: &str, b: &str) -> MeasureResult<f64>;

    /// Score many pairs. Concrete measures override this to batch backend
    /// fetches.
    fn batch_similarity(&self, pairs: &[(EntityId, EntityId)]) -> Vec<f64> {
        pairs
            .iter()
            .map(|(a, b)| self.similarity(a, b).unwrap_or_else(|e| degrade(self.name(), a, b, &e)))
            .collect()
    }

    /// Score `a` against every entity in `others`.
    fn similarity_to_many(&self, a: &str, others: &[EntityId]) -> Vec<f64> {
        let pairs: Vec<(EntityId, EntityId)> = others
            .iter()
            .map(|b| (a.to_string(), b.clone()))
            .collect();
        self.batch_similarity(&pairs)
    }

    /// Entities among `entities` that lack the data this measure needs.
    /// Used by the service layer to report "not present" instead of 0.0.
    fn missing_inputs(&self, _entities: &[&str]) -> MeasureResult<Vec<EntityId>> {
        Ok(Vec::new())
    }

    /// Best `k` neighbors of `a`, excluding `a`. Measures without a retrieval
    /// path return an empty list.
    fn top_k(&self, _a: &str, _k: usize) -> MeasureResult<Vec<ScoredEntity>> {
        Ok(Vec::new())
    }
}

/// Log a pairwise failure and score it as 0.0.
pub fn degrade(measure: &str, a: &str, b: &str, error: &dyn std::fmt::Display) -> f64 {
    debug!(measure, a, b, %error, "pair not scorable, using 0.0");
    0.0
}
