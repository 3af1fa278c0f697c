//! Jiang-Conrath ontology-distance similarity.
//!
//! For classes `c1`, `c2` with most specific subsumer `s`:
//!
//! ```text
//! dist(s)  = 2 ln(p(s)) - (ln(p(c1)) + ln(p(c2)))      p(x) = count(x) / N
//! max_dist = -(ln(p(c1)) + ln(p(c2)))                   (distance through the root)
//! sim(s)   = 1 - dist(s) / max_dist
//! ```
//!
//! Several subsumers are combined by [`SubsumerAggregation`].

use std::sync::Arc;

use kgsim_cache::NodeStore;
use kgsim_core::config::{OntologyConfig, SubsumerAggregation};
use kgsim_core::errors::MeasureResult;
use kgsim_core::models::{EntityId, MeasureFamily};
use kgsim_core::traits::ISimilarityMeasure;
use serde::Serialize;

/// One most specific subsumer's contribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsumerScore {
    pub class: EntityId,
    pub label: Option<String>,
    pub count: u64,
    /// `None` when the counts are inconsistent (negative distance) or the
    /// subsumer has no count.
    pub distance: Option<f64>,
    pub similarity: f64,
}

/// Per-subsumer breakdown of a Jiang-Conrath score.
///
/// Listed subsumers with inconsistent counts report similarity 0.0, while
/// `max_similarity` clamps their distance to 0 exactly as the `Max`
/// aggregation does, so it always equals the `Max` score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JcExplanation {
    pub c1: EntityId,
    pub c2: EntityId,
    /// Sorted by similarity, best first.
    pub subsumers: Vec<SubsumerScore>,
    /// Parallel-resistor distance `1 / sum(1 / dist_i)`.
    pub aggregate_distance: f64,
    pub aggregate_similarity: f64,
    /// Score under [`SubsumerAggregation::Max`].
    pub max_similarity: f64,
}

/// `N` and the pair-dependent terms of the distance formula.
struct PairTerms {
    n: f64,
    term2: f64,
}

impl PairTerms {
    fn max_dist(&self) -> f64 {
        -self.term2
    }

    fn distance(&self, subsumer_count: u64) -> f64 {
        2.0 * (subsumer_count as f64 / self.n).ln() - self.term2
    }

    fn similarity(&self, distance: f64) -> f64 {
        (1.0 - distance / self.max_dist()).clamp(0.0, 1.0)
    }
}

/// `1 / sum(1 / d)` over consistent distances. A zero distance short-circuits
/// to 0; no distances at all yield `max_dist`.
fn parallel_resistor(distances: &mut [f64], max_dist: f64) -> f64 {
    if distances.is_empty() {
        return max_dist;
    }
    if distances.iter().any(|d| *d == 0.0) {
        return 0.0;
    }
    distances.sort_by(|a, b| a.total_cmp(b));
    1.0 / distances.iter().map(|d| 1.0 / d).sum::<f64>()
}

/// Best subsumer similarity, with negative distances from inconsistent
/// counts clamped to 0. Subsumers without a count are skipped.
fn max_over_subsumers(terms: &PairTerms, counts: &[(EntityId, u64)]) -> f64 {
    counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(_, count)| terms.similarity(terms.distance(*count).max(0.0)))
        .fold(0.0, f64::max)
}

pub struct JiangConrathMeasure {
    store: Arc<NodeStore>,
    ontology: OntologyConfig,
    aggregation: SubsumerAggregation,
    name: String,
}

impl JiangConrathMeasure {
    pub fn new(store: Arc<NodeStore>, ontology: OntologyConfig) -> Self {
        let aggregation = ontology.subsumer_aggregation;
        Self {
            store,
            ontology,
            aggregation,
            name: "jc".to_string(),
        }
    }

    /// Same measure with a different subsumer aggregation.
    pub fn with_aggregation(mut self, aggregation: SubsumerAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Register the measure under another name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn aggregation(&self) -> SubsumerAggregation {
        self.aggregation
    }

    fn count_or_default(&self, class: &str) -> MeasureResult<u64> {
        Ok(match self.store.class_count(class)? {
            0 => self.ontology.default_class_count.max(1),
            n => n,
        })
    }

    fn pair_terms(&self, c1: &str, c2: &str) -> MeasureResult<PairTerms> {
        let n = self.store.class_count(&self.ontology.root_class)?.max(1) as f64;
        let p1 = self.count_or_default(c1)? as f64 / n;
        let p2 = self.count_or_default(c2)? as f64 / n;
        Ok(PairTerms {
            n,
            term2: p1.ln() + p2.ln(),
        })
    }

    /// Subsumers with their counts, in id order. Subsumers without a count
    /// have count 0.
    fn subsumer_counts(&self, c1: &str, c2: &str) -> MeasureResult<Vec<(EntityId, u64)>> {
        let subsumers = self.store.most_specific_subsumers(c1, c2)?;
        let mut sorted: Vec<&EntityId> = subsumers.iter().collect();
        sorted.sort();
        sorted
            .into_iter()
            .map(|s| Ok((s.clone(), self.store.class_count(s)?)))
            .collect()
    }

    /// Full per-subsumer breakdown.
    pub fn explain(&self, c1: &str, c2: &str) -> MeasureResult<JcExplanation> {
        let mut explanation = JcExplanation {
            c1: c1.to_string(),
            c2: c2.to_string(),
            subsumers: Vec::new(),
            aggregate_distance: 0.0,
            aggregate_similarity: 0.0,
            max_similarity: 0.0,
        };
        if c1 == c2 {
            explanation.subsumers.push(SubsumerScore {
                class: c1.to_string(),
                label: self.store.label(c1)?,
                count: self.count_or_default(c1)?,
                distance: Some(0.0),
                similarity: 1.0,
            });
            explanation.aggregate_similarity = 1.0;
            explanation.max_similarity = 1.0;
            return Ok(explanation);
        }

        let counts = self.subsumer_counts(c1, c2)?;
        if counts.is_empty() {
            return Ok(explanation);
        }
        let terms = self.pair_terms(c1, c2)?;
        let usable = terms.max_dist() > 0.0;

        let mut consistent = Vec::new();
        for (class, count) in counts.iter().cloned() {
            let distance = Some(count)
                .filter(|c| *c > 0 && usable)
                .map(|c| terms.distance(c))
                .filter(|d| *d >= 0.0);
            let similarity = distance.map_or(0.0, |d| terms.similarity(d));
            consistent.extend(distance);
            explanation.subsumers.push(SubsumerScore {
                label: self.store.label(&class)?,
                class,
                count,
                distance,
                similarity,
            });
        }

        explanation
            .subsumers
            .sort_by(|a, b| b.similarity.total_cmp(&a.similarity).then_with(|| a.class.cmp(&b.class)));
        if usable {
            explanation.max_similarity = max_over_subsumers(&terms, &counts);
            explanation.aggregate_distance = parallel_resistor(&mut consistent, terms.max_dist());
            explanation.aggregate_similarity = terms.similarity(explanation.aggregate_distance);
        }
        Ok(explanation)
    }
}

impl ISimilarityMeasure for JiangConrathMeasure {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> MeasureFamily {
        MeasureFamily::Ontology
    }

    fn similarity(&self, c1: &str, c2: &str) -> MeasureResult<f64> {
        if c1 == c2 {
            return Ok(1.0);
        }
        let counts = self.subsumer_counts(c1, c2)?;
        if counts.is_empty() {
            return Ok(0.0);
        }
        let terms = self.pair_terms(c1, c2)?;
        if !(terms.max_dist() > 0.0) {
            return Ok(0.0);
        }
        let score = match self.aggregation {
            SubsumerAggregation::Max => max_over_subsumers(&terms, &counts),
            SubsumerAggregation::ParallelResistor => {
                let mut consistent: Vec<f64> = counts
                    .iter()
                    .filter(|(_, count)| *count > 0)
                    .map(|(_, count)| terms.distance(*count))
                    .filter(|d| *d >= 0.0)
                    .collect();
                terms.similarity(parallel_resistor(&mut consistent, terms.max_dist()))
            }
        };
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgsim_cache::TieredNodeCache;
    use test_fixtures::InMemoryKnowledgeGraph;

    /// Two professions sharing a narrow and a broad subsumer.
    fn graph() -> InMemoryKnowledgeGraph {
        InMemoryKnowledgeGraph::builder()
            .label("rescuer", "rescuer")
            .class_count("root", 1_000_000)
            .class_count("profession", 10_000)
            .class_count("rescuer", 100)
            .class_count("firefighter", 40)
            .class_count("paramedic", 30)
            .class_count("island", 5)
            .subclass("firefighter", "rescuer")
            .subclass("paramedic", "rescuer")
            .subclass("firefighter", "profession")
            .subclass("paramedic", "profession")
            .subclass("rescuer", "root")
            .subclass("profession", "root")
            .subclass("odd", "profession")
            .subclass("odd2", "profession")
            .class_count("odd", 50_000)
            .class_count("odd2", 60_000)
            .build()
    }

    fn measure() -> JiangConrathMeasure {
        let store = NodeStore::new(Arc::new(graph()), Arc::new(TieredNodeCache::new(1_000, 0)), 1_000);
        let ontology = OntologyConfig {
            root_class: "root".to_string(),
            ..OntologyConfig::default()
        };
        JiangConrathMeasure::new(Arc::new(store), ontology)
    }

    fn expected_sim(subsumer: f64, c1: f64, c2: f64, n: f64) -> f64 {
        let term2 = (c1 / n).ln() + (c2 / n).ln();
        1.0 - (2.0 * (subsumer / n).ln() - term2) / -term2
    }

    #[test]
    fn max_picks_the_most_specific_subsumer() {
        let m = measure();
        let sim = m.similarity("firefighter", "paramedic").unwrap();
        let expected = expected_sim(100.0, 40.0, 30.0, 1e6);
        assert!((sim - expected).abs() < 1e-12);
        assert!(sim > expected_sim(10_000.0, 40.0, 30.0, 1e6));
    }

    #[test]
    fn parallel_resistor_combines_subsumers() {
        let m = measure().with_aggregation(SubsumerAggregation::ParallelResistor);
        let sim = m.similarity("firefighter", "paramedic").unwrap();
        let max = measure().similarity("firefighter", "paramedic").unwrap();
        assert!(sim >= max);
        assert!(sim <= 1.0);
    }

    #[test]
    fn identical_classes_are_fully_similar() {
        assert_eq!(measure().similarity("rescuer", "rescuer").unwrap(), 1.0);
    }

    #[test]
    fn disjoint_classes_score_zero() {
        assert_eq!(measure().similarity("island", "firefighter").unwrap(), 0.0);
    }

    #[test]
    fn inconsistent_counts_are_clamped() {
        // Both children outnumber their common parent's share of N.
        let m = measure();
        assert_eq!(m.similarity("odd", "odd2").unwrap(), 1.0);
        let explanation = m.explain("odd", "odd2").unwrap();
        assert_eq!(explanation.subsumers.len(), 1);
        assert_eq!(explanation.subsumers[0].distance, None);
        assert_eq!(explanation.subsumers[0].similarity, 0.0);
        assert_eq!(explanation.aggregate_similarity, 0.0);
        // The reported maximum follows the clamped Max score, not the list.
        assert_eq!(explanation.max_similarity, m.similarity("odd", "odd2").unwrap());
    }

    #[test]
    fn explanation_lists_subsumers_best_first() {
        let m = measure();
        let explanation = m.explain("firefighter", "paramedic").unwrap();
        let classes: Vec<&str> = explanation.subsumers.iter().map(|s| s.class.as_str()).collect();
        assert_eq!(classes, vec!["rescuer", "profession"]);
        assert_eq!(explanation.subsumers[0].label.as_deref(), Some("rescuer"));
        assert_eq!(explanation.subsumers[0].count, 100);
        assert_eq!(
            explanation.max_similarity,
            m.similarity("firefighter", "paramedic").unwrap()
        );
        let resistor = m
            .with_aggregation(SubsumerAggregation::ParallelResistor)
            .similarity("firefighter", "paramedic")
            .unwrap();
        assert!((explanation.aggregate_similarity - resistor).abs() < 1e-12);
    }

    #[test]
    fn explanation_of_identical_and_disjoint_pairs() {
        let m = measure();
        let same = m.explain("rescuer", "rescuer").unwrap();
        assert_eq!(same.max_similarity, 1.0);
        assert_eq!(same.subsumers[0].distance, Some(0.0));
        let none = m.explain("island", "rescuer").unwrap();
        assert!(none.subsumers.is_empty());
        assert_eq!(none.max_similarity, 0.0);
    }

    #[test]
    fn parallel_resistor_edge_cases() {
        assert_eq!(parallel_resistor(&mut [], 7.0), 7.0);
        assert_eq!(parallel_resistor(&mut [2.0, 0.0], 7.0), 0.0);
        assert!((parallel_resistor(&mut [2.0, 2.0], 7.0) - 1.0).abs() < 1e-12);
    }
}
