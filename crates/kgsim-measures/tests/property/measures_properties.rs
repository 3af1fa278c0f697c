//! Property tests for the base and composite measures over random ontologies.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use kgsim_cache::{NodeStore, TieredNodeCache};
use kgsim_core::config::{OntologyConfig, SubsumerAggregation, WeightedSplitConfig};
use kgsim_core::traits::ISimilarityMeasure;
use kgsim_core::{EmbeddingKind, EntityId};
use kgsim_measures::{
    ClassIdfMeasure, EmbeddingMeasure, JiangConrathMeasure, MeanCombination, MeasureRef,
    OntologyReduction, WeightedSplit,
};
use proptest::prelude::*;
use test_fixtures::InMemoryKnowledgeGraph;

const NODES: usize = 7;

/// A random ontology over `n0..n6` rooted at `n0`. Every node is also an
/// entity with an optional embedding and optional class data.
#[derive(Debug, Clone)]
struct World {
    vectors: Vec<Option<Vec<f32>>>,
    counts: Vec<u64>,
    parents: Vec<Vec<usize>>,
    has_classes: Vec<bool>,
}

fn node(i: usize) -> String {
    format!("n{i}")
}

fn arb_world() -> impl Strategy<Value = World> {
    (
        prop::collection::vec(prop::option::of(prop::collection::vec(-1.0f32..1.0, 3)), NODES),
        prop::collection::vec(1u64..1000, NODES),
        prop::collection::vec(prop::collection::vec(any::<bool>(), NODES), NODES),
        prop::collection::vec(any::<bool>(), NODES),
    )
        .prop_map(|(vectors, mut counts, bits, has_classes)| {
            counts[0] = 1000;
            let parents = (0..NODES)
                .map(|i| {
                    if i == 0 {
                        return Vec::new();
                    }
                    let chosen: Vec<usize> = (0..i).filter(|j| bits[i][*j]).collect();
                    if chosen.is_empty() {
                        vec![0]
                    } else {
                        chosen
                    }
                })
                .collect();
            World {
                vectors,
                counts,
                parents,
                has_classes,
            }
        })
}

impl World {
    fn strict_ancestors(&self, i: usize) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        let mut stack = self.parents[i].clone();
        while let Some(p) = stack.pop() {
            if out.insert(p) {
                stack.extend(self.parents[p].iter().copied());
            }
        }
        out
    }

    fn graph(&self) -> InMemoryKnowledgeGraph {
        let mut builder = InMemoryKnowledgeGraph::builder();
        for i in 0..NODES {
            builder = builder.class_count(&node(i), self.counts[i]);
            if let Some(v) = &self.vectors[i] {
                builder = builder.embedding(&node(i), EmbeddingKind::Complex, v.clone());
            }
            for p in &self.parents[i] {
                builder = builder.subclass(&node(i), &node(*p));
            }
            if self.has_classes[i] {
                let classes: BTreeMap<String, u64> = self
                    .strict_ancestors(i)
                    .into_iter()
                    .map(|a| (node(a), self.counts[a]))
                    .collect();
                let classes: Vec<(&str, u64)> =
                    classes.iter().map(|(c, n)| (c.as_str(), *n)).collect();
                builder = builder.classes(&node(i), &classes);
            }
        }
        builder.build()
    }

    fn measures(&self) -> Vec<MeasureRef> {
        let store = Arc::new(NodeStore::new(
            Arc::new(self.graph()),
            Arc::new(TieredNodeCache::new(1_000, 0)),
            1_000,
        ));
        let ontology = OntologyConfig {
            root_class: node(0),
            ..OntologyConfig::default()
        };
        let complex: MeasureRef = Arc::new(EmbeddingMeasure::new(EmbeddingKind::Complex, Arc::clone(&store)));
        let class: MeasureRef = Arc::new(ClassIdfMeasure::new(Arc::clone(&store), ontology.clone()));
        let jc: MeasureRef = Arc::new(JiangConrathMeasure::new(Arc::clone(&store), ontology.clone()));
        let jc_pr: MeasureRef = Arc::new(
            JiangConrathMeasure::new(store, ontology)
                .with_aggregation(SubsumerAggregation::ParallelResistor)
                .named("jc-parallel"),
        );
        let mean: MeasureRef = Arc::new(MeanCombination::new(
            "combo-mean",
            vec![Arc::clone(&complex), Arc::clone(&class), Arc::clone(&jc)],
        ));
        let split: MeasureRef = Arc::new(WeightedSplit::new(
            "combo-weighted-max",
            vec![Arc::clone(&complex)],
            vec![Arc::clone(&class), Arc::clone(&jc)],
            WeightedSplitConfig::new((0.4, 0.6)),
            OntologyReduction::Max,
        ));
        vec![complex, class, jc, jc_pr, mean, split]
    }
}

fn all_pairs() -> Vec<(EntityId, EntityId)> {
    let mut pairs = Vec::new();
    for a in 0..NODES {
        for b in 0..NODES {
            pairs.push((node(a), node(b)));
        }
    }
    // An entity the backend has never heard of.
    pairs.push((node(1), "ghost".to_string()));
    pairs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn scores_are_symmetric(world in arb_world()) {
        for measure in world.measures() {
            for (a, b) in all_pairs() {
                let ab = measure.similarity(&a, &b).unwrap_or(0.0);
                let ba = measure.similarity(&b, &a).unwrap_or(0.0);
                prop_assert!((ab - ba).abs() < 1e-12, "{} not symmetric on ({}, {})", measure.name(), a, b);
            }
        }
    }

    #[test]
    fn scores_stay_in_unit_range(world in arb_world()) {
        for measure in world.measures() {
            for score in measure.batch_similarity(&all_pairs()) {
                prop_assert!((0.0..=1.0).contains(&score), "{} produced {}", measure.name(), score);
            }
        }
    }

    #[test]
    fn batch_agrees_with_single_pairs(world in arb_world()) {
        for measure in world.measures() {
            let pairs = all_pairs();
            let batch = measure.batch_similarity(&pairs);
            for ((a, b), batched) in pairs.iter().zip(batch) {
                let single = measure.batch_similarity(&[(a.clone(), b.clone())])[0];
                prop_assert_eq!(single, measure.similarity(a, b).unwrap_or(0.0));
                prop_assert!((single - batched).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn ontology_self_similarity_is_one(world in arb_world()) {
        let measures = world.measures();
        for i in 0..NODES {
            prop_assert_eq!(measures[2].similarity(&node(i), &node(i)).unwrap(), 1.0);
            prop_assert_eq!(measures[3].similarity(&node(i), &node(i)).unwrap(), 1.0);
            if world.vectors[i].as_ref().is_some_and(|v| v.iter().any(|x| *x != 0.0)) {
                let sim = measures[0].similarity(&node(i), &node(i)).unwrap();
                prop_assert!((sim - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn to_many_matches_pairwise(world in arb_world(), a in 0..NODES) {
        let measures = world.measures();
        let complex = &measures[0];
        let others: Vec<EntityId> = (0..NODES).map(node).chain(["ghost".to_string()]).collect();
        let many = complex.similarity_to_many(&node(a), &others);
        for (other, score) in others.iter().zip(many) {
            let single = complex.similarity(&node(a), other).unwrap();
            prop_assert!((single - score).abs() < 1e-12);
        }
    }
}
