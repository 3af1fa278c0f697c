//! Information-theoretic class similarity.
//!
//! Each entity's features are the classes it belongs to plus the entity
//! itself. A feature's weight is `ln(N / count)` times the number of the two
//! query entities holding it; weights are normalized to sum to 1 and the
//! score is the weight mass of the shared features.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use kgsim_cache::NodeStore;
use kgsim_core::config::OntologyConfig;
use kgsim_core::errors::{MeasureError, MeasureResult};
use kgsim_core::models::{EntityId, MeasureFamily};
use kgsim_core::traits::similarity_measure::degrade;
use kgsim_core::traits::ISimilarityMeasure;

/// `(class, transitive count)` features of one entity.
type Features = Vec<(EntityId, u64)>;

pub struct ClassIdfMeasure {
    store: Arc<NodeStore>,
    ontology: OntologyConfig,
}

impl ClassIdfMeasure {
    pub fn new(store: Arc<NodeStore>, ontology: OntologyConfig) -> Self {
        Self { store, ontology }
    }

    /// Transitive count of the root class, the `N` of every IDF term.
    fn reference_count(&self) -> MeasureResult<f64> {
        Ok(self.store.class_count(&self.ontology.root_class)?.max(1) as f64)
    }

    /// `None` when the entity has no class data at all.
    fn features(&self, entity: &str) -> MeasureResult<Option<Features>> {
        let Some(membership) = self.store.class_membership(entity)? else {
            return Ok(None);
        };
        let mut features: Features = membership
            .entries()
            .iter()
            .map(|e| (e.class.clone(), e.count))
            .collect();
        if !membership.contains(entity) {
            let count = match self.store.class_count(entity)? {
                0 => self.ontology.default_class_count,
                n => n,
            };
            features.push((entity.to_string(), count));
        }
        Ok(Some(features))
    }
}

/// Normalized IDF weight of the features shared by `a` and `b`.
///
/// Entities are visited in id order so the first-seen count of a class, and
/// therefore the score, does not depend on argument order.
fn idf_overlap(a: &str, fa: &Features, b: &str, fb: &Features, n: f64) -> f64 {
    let sides: Vec<&Features> = match a.cmp(b) {
        std::cmp::Ordering::Equal => vec![fa],
        std::cmp::Ordering::Less => vec![fa, fb],
        std::cmp::Ordering::Greater => vec![fb, fa],
    };

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    let mut holders: BTreeMap<&str, u32> = BTreeMap::new();
    for features in &sides {
        let mut seen: HashSet<&str> = HashSet::new();
        for (class, count) in features.iter() {
            counts.entry(class.as_str()).or_insert(*count);
            if seen.insert(class.as_str()) {
                *holders.entry(class.as_str()).or_insert(0) += 1;
            }
        }
    }

    let weights: BTreeMap<&str, f64> = counts
        .iter()
        .map(|(class, count)| {
            let idf = (n / (*count).max(1) as f64).ln().max(0.0);
            let holders = holders.get(class).copied().unwrap_or(0);
            (*class, f64::from(holders) * idf)
        })
        .collect();
    let total: f64 = weights.values().sum();
    if !(total > 0.0) {
        return 0.0;
    }

    let in_a: HashSet<&str> = fa.iter().map(|(c, _)| c.as_str()).collect();
    let in_b: HashSet<&str> = fb.iter().map(|(c, _)| c.as_str()).collect();
    let shared: f64 = weights
        .iter()
        .filter(|(class, _)| in_a.contains(*class) && in_b.contains(*class))
        .map(|(_, w)| w / total)
        .sum();
    shared.clamp(0.0, 1.0)
}

impl ISimilarityMeasure for ClassIdfMeasure {
    fn name(&self) -> &str {
        "class"
    }

    fn family(&self) -> MeasureFamily {
        MeasureFamily::Ontology
    }

    /// Fails with `IncomparableData` when either side has no class data.
    fn similarity(&self, a: &str, b: &str) -> MeasureResult<f64> {
        let fa = self.features(a)?;
        let fb = if a == b { fa.clone() } else { self.features(b)? };
        match (fa, fb) {
            (Some(fa), Some(fb)) => Ok(idf_overlap(a, &fa, b, &fb, self.reference_count()?)),
            _ => Err(MeasureError::incomparable(a, b, "missing class data")),
        }
    }

    /// Resolves each distinct entity's features once.
    fn batch_similarity(&self, pairs: &[(EntityId, EntityId)]) -> Vec<f64> {
        let n = match self.reference_count() {
            Ok(n) => n,
            Err(e) => {
                return pairs
                    .iter()
                    .map(|(a, b)| degrade(self.name(), a, b, &e))
                    .collect();
            }
        };
        let mut features: HashMap<&str, MeasureResult<Option<Features>>> = HashMap::new();
        for (a, b) in pairs {
            for entity in [a.as_str(), b.as_str()] {
                features
                    .entry(entity)
                    .or_insert_with(|| self.features(entity));
            }
        }
        pairs
            .iter()
            .map(|(a, b)| match (&features[a.as_str()], &features[b.as_str()]) {
                (Ok(Some(fa)), Ok(Some(fb))) => idf_overlap(a, fa, b, fb, n),
                (Err(e), _) | (_, Err(e)) => degrade(self.name(), a, b, e),
                _ => 0.0,
            })
            .collect()
    }

    /// Only entities the graph does not know at all. A known entity without
    /// class data is incomparable, which `similarity` reports as an error.
    fn missing_inputs(&self, entities: &[&str]) -> MeasureResult<Vec<EntityId>> {
        let mut missing = Vec::new();
        for entity in entities {
            if self.store.class_membership(entity)?.is_none() && self.store.label(entity)?.is_none() {
                missing.push(entity.to_string());
            }
        }
        Ok(missing)
    }
}
