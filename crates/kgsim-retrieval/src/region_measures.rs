//! Similarity measures built on top-similarity regions.
//!
//! Both score pairs in canonical id order so results are exactly symmetric,
//! and both compute single pairs through their batch path. A pair whose region
//! cannot be computed scores 0.0.

use std::sync::Arc;

use kgsim_core::errors::MeasureResult;
use kgsim_core::models::entity::sort_ranked;
use kgsim_core::models::MeasureFamily;
use kgsim_core::traits::similarity_measure::degrade;
use kgsim_core::traits::ISimilarityMeasure;
use kgsim_core::{EntityId, ScoredEntity};

use crate::regions::TopSimRegions;

fn canonical<'a>(a: &'a EntityId, b: &'a EntityId) -> (&'a EntityId, &'a EntityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn first_or_zero(scores: Vec<f64>) -> f64 {
    scores.first().copied().unwrap_or(0.0)
}

/// Base score if either node is in the other's region, else 0.0.
pub struct RegionGatedMeasure {
    name: String,
    regions: Arc<TopSimRegions>,
}

impl RegionGatedMeasure {
    pub fn new(name: impl Into<String>, regions: Arc<TopSimRegions>) -> Self {
        Self {
            name: name.into(),
            regions,
        }
    }

    fn related(&self, a: &str, b: &str) -> MeasureResult<bool> {
        Ok(self.regions.contains(a, b)? || self.regions.contains(b, a)?)
    }
}

impl ISimilarityMeasure for RegionGatedMeasure {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> MeasureFamily {
        MeasureFamily::Region
    }

    fn similarity(&self, a: &str, b: &str) -> MeasureResult<f64> {
        Ok(first_or_zero(self.batch_similarity(&[(a.to_string(), b.to_string())])))
    }

    fn batch_similarity(&self, pairs: &[(EntityId, EntityId)]) -> Vec<f64> {
        let mut scores = vec![0.0; pairs.len()];
        let mut gated: Vec<(EntityId, EntityId)> = Vec::new();
        let mut slots: Vec<usize> = Vec::new();
        for (i, (a, b)) in pairs.iter().enumerate() {
            if a == b {
                scores[i] = 1.0;
                continue;
            }
            let (a, b) = canonical(a, b);
            match self.related(a, b) {
                Ok(true) => {
                    gated.push((a.clone(), b.clone()));
                    slots.push(i);
                }
                Ok(false) => {}
                Err(e) => {
                    degrade(self.name(), a, b, &e);
                }
            }
        }
        let base = self.regions.scorer().batch_similarity(&gated);
        for (slot, score) in slots.into_iter().zip(base) {
            scores[slot] = score;
        }
        scores
    }

    fn missing_inputs(&self, entities: &[&str]) -> MeasureResult<Vec<EntityId>> {
        self.regions.scorer().missing_inputs(entities)
    }

    /// Every region member passes the gate, so the top-k is the head of the
    /// region itself.
    fn top_k(&self, a: &str, k: usize) -> MeasureResult<Vec<ScoredEntity>> {
        Ok(self.regions.region(a)?.iter().take(k).cloned().collect())
    }
}

/// Where one pair's terms sit in the flattened base-measure batch.
enum Plan {
    Fixed(f64),
    Blend { start: usize, weights: Vec<f64> },
}

/// Weighted blend of the direct score with both nodes' region evidence.
///
/// With `Ra`, `Rb` the first `k` region members of `a` and `b`, each member
/// `m` weighted by its own region score `w_m`:
///
/// ```text
/// (base(a,b) + Σ_{m∈Ra} w_m·base(m,b) + Σ_{m∈Rb} w_m·base(a,m)) / (1 + Σ w_m)
/// ```
///
/// capped at 1.0. Identical nodes score 1.0 without looking at regions.
pub struct RegionBlendMeasure {
    name: String,
    regions: Arc<TopSimRegions>,
}

impl RegionBlendMeasure {
    pub fn new(name: impl Into<String>, regions: Arc<TopSimRegions>) -> Self {
        Self {
            name: name.into(),
            regions,
        }
    }

    fn head(&self, node: &str) -> MeasureResult<Vec<ScoredEntity>> {
        let k = self.regions.config().k;
        Ok(self.regions.region(node)?.iter().take(k).cloned().collect())
    }

    fn plan(
        &self,
        a: &EntityId,
        b: &EntityId,
        terms: &mut Vec<(EntityId, EntityId)>,
    ) -> MeasureResult<Plan> {
        if a == b {
            return Ok(Plan::Fixed(1.0));
        }
        let (a, b) = canonical(a, b);
        let (ra, rb) = (self.head(a)?, self.head(b)?);
        let start = terms.len();
        terms.push((a.clone(), b.clone()));
        terms.extend(ra.iter().map(|m| (m.entity.clone(), b.clone())));
        terms.extend(rb.iter().map(|m| (a.clone(), m.entity.clone())));
        let weights = ra.iter().chain(&rb).map(|m| m.score).collect();
        Ok(Plan::Blend { start, weights })
    }
}

fn blend(direct: f64, evidence: &[f64], weights: &[f64]) -> f64 {
    let numerator = direct
        + evidence
            .iter()
            .zip(weights)
            .map(|(s, w)| s * w)
            .sum::<f64>();
    let denominator = 1.0 + weights.iter().sum::<f64>();
    let score = numerator / denominator;
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

impl ISimilarityMeasure for RegionBlendMeasure {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> MeasureFamily {
        MeasureFamily::Region
    }

    fn similarity(&self, a: &str, b: &str) -> MeasureResult<f64> {
        Ok(first_or_zero(self.batch_similarity(&[(a.to_string(), b.to_string())])))
    }

    /// All pairs' direct and evidence terms go to the base measure in one
    /// batch.
    fn batch_similarity(&self, pairs: &[(EntityId, EntityId)]) -> Vec<f64> {
        let mut terms: Vec<(EntityId, EntityId)> = Vec::new();
        let plans: Vec<Plan> = pairs
            .iter()
            .map(|(a, b)| {
                self.plan(a, b, &mut terms).unwrap_or_else(|e| {
                    Plan::Fixed(degrade(self.name(), a, b, &e))
                })
            })
            .collect();
        let base = self.regions.scorer().batch_similarity(&terms);
        plans
            .into_iter()
            .map(|plan| match plan {
                Plan::Fixed(score) => score,
                Plan::Blend { start, weights } => {
                    let end = start + 1 + weights.len();
                    match base.get(start..end) {
                        Some(row) => blend(row[0], &row[1..], &weights),
                        None => 0.0,
                    }
                }
            })
            .collect()
    }

    fn missing_inputs(&self, entities: &[&str]) -> MeasureResult<Vec<EntityId>> {
        self.regions.scorer().missing_inputs(entities)
    }

    /// Region members of `a` re-scored with the blend.
    fn top_k(&self, a: &str, k: usize) -> MeasureResult<Vec<ScoredEntity>> {
        let members: Vec<EntityId> = self.regions.region(a)?.iter().map(|m| m.entity.clone()).collect();
        let scores = self.similarity_to_many(a, &members);
        let mut ranked: Vec<ScoredEntity> = members
            .into_iter()
            .zip(scores)
            .map(|(entity, score)| ScoredEntity::new(entity, score))
            .collect();
        sort_ranked(&mut ranked);
        ranked.truncate(k);
        Ok(ranked)
    }
}
