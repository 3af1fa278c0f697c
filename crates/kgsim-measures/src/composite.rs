//! Combinators over child measures.
//!
//! Children run their batch form once per call (in parallel across children)
//! and the combinator reduces the resulting columns element-wise. Single pairs
//! go through the batch path, so composites never surface per-pair errors.
//! Outputs are clamped to `[0, 1]`.

use std::sync::Arc;

use kgsim_core::config::WeightedSplitConfig;
use kgsim_core::errors::MeasureResult;
use kgsim_core::models::{EntityId, MeasureFamily};
use kgsim_core::traits::ISimilarityMeasure;
use rayon::prelude::*;

pub type MeasureRef = Arc<dyn ISimilarityMeasure>;

/// One score column per child, each aligned with `pairs`.
fn child_columns(children: &[MeasureRef], pairs: &[(EntityId, EntityId)]) -> Vec<Vec<f64>> {
    children
        .par_iter()
        .map(|child| child.batch_similarity(pairs))
        .collect()
}

fn row_mean(columns: &[Vec<f64>], row: usize) -> f64 {
    if columns.is_empty() {
        return 0.0;
    }
    columns.iter().map(|c| c.get(row).copied().unwrap_or(0.0)).sum::<f64>() / columns.len() as f64
}

fn row_max(columns: &[Vec<f64>], row: usize) -> f64 {
    columns
        .iter()
        .map(|c| c.get(row).copied().unwrap_or(0.0))
        .fold(0.0, f64::max)
}

fn clamp_unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

fn first_or_zero(scores: Vec<f64>) -> f64 {
    scores.first().copied().unwrap_or(0.0)
}

/// Element-wise mean of every child's score.
pub struct MeanCombination {
    name: String,
    members: Vec<MeasureRef>,
}

impl MeanCombination {
    pub fn new(name: impl Into<String>, members: Vec<MeasureRef>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn members(&self) -> &[MeasureRef] {
        &self.members
    }
}

impl ISimilarityMeasure for MeanCombination {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> MeasureFamily {
        MeasureFamily::Composite
    }

    fn similarity(&self, a: &str, b: &str) -> MeasureResult<f64> {
        Ok(first_or_zero(self.batch_similarity(&[(a.to_string(), b.to_string())])))
    }

    fn batch_similarity(&self, pairs: &[(EntityId, EntityId)]) -> Vec<f64> {
        let columns = child_columns(&self.members, pairs);
        (0..pairs.len())
            .map(|row| clamp_unit(row_mean(&columns, row)))
            .collect()
    }
}

/// How the ontology half of a [`WeightedSplit`] is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OntologyReduction {
    Max,
    Mean,
}

/// `w0 * mean(embedding scores) + w1 * reduce(ontology scores)`.
pub struct WeightedSplit {
    name: String,
    embedding: Vec<MeasureRef>,
    ontology: Vec<MeasureRef>,
    weights: WeightedSplitConfig,
    reduction: OntologyReduction,
}

impl WeightedSplit {
    pub fn new(
        name: impl Into<String>,
        embedding: Vec<MeasureRef>,
        ontology: Vec<MeasureRef>,
        weights: WeightedSplitConfig,
        reduction: OntologyReduction,
    ) -> Self {
        Self {
            name: name.into(),
            embedding,
            ontology,
            weights,
            reduction,
        }
    }

    pub fn reduction(&self) -> OntologyReduction {
        self.reduction
    }
}

impl ISimilarityMeasure for WeightedSplit {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> MeasureFamily {
        MeasureFamily::Composite
    }

    fn similarity(&self, a: &str, b: &str) -> MeasureResult<f64> {
        Ok(first_or_zero(self.batch_similarity(&[(a.to_string(), b.to_string())])))
    }

    fn batch_similarity(&self, pairs: &[(EntityId, EntityId)]) -> Vec<f64> {
        let (embedding, ontology) = rayon::join(
            || child_columns(&self.embedding, pairs),
            || child_columns(&self.ontology, pairs),
        );
        (0..pairs.len())
            .map(|row| {
                let onto = match self.reduction {
                    OntologyReduction::Max => row_max(&ontology, row),
                    OntologyReduction::Mean => row_mean(&ontology, row),
                };
                clamp_unit(
                    self.weights.embedding_weight * row_mean(&embedding, row)
                        + self.weights.ontology_weight * onto,
                )
            })
            .collect()
    }
}
