//! Property tests for ANN-assisted top-k and the region measures.

use std::collections::HashSet;
use std::sync::Arc;

use kgsim_cache::{NodeStore, TieredNodeCache};
use kgsim_core::config::KgSimConfig;
use kgsim_core::traits::ISimilarityMeasure;
use kgsim_core::{EmbeddingKind, EntityId, ScoredEntity};
use kgsim_measures::EmbeddingMeasure;
use kgsim_retrieval::index::entries_from_store;
use kgsim_retrieval::{ExactIndex, IndexStrategy, SimilarityEngine};
use proptest::prelude::*;
use test_fixtures::InMemoryKnowledgeGraph;

const ENTITIES: usize = 24;
const NODES: usize = 8;

fn entity(i: usize) -> String {
    format!("e{i}")
}

fn node(i: usize) -> String {
    format!("n{i}")
}

fn arb_vectors(n: usize) -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 4), n)
}

fn embedding_measure(vectors: &[Vec<f32>]) -> EmbeddingMeasure {
    let mut builder = InMemoryKnowledgeGraph::builder();
    for (i, v) in vectors.iter().enumerate() {
        builder = builder.embedding(&entity(i), EmbeddingKind::Complex, v.clone());
    }
    let store = Arc::new(NodeStore::new(
        Arc::new(builder.build()),
        Arc::new(TieredNodeCache::new(1_000, 0)),
        1_000,
    ));
    let ids: Vec<EntityId> = (0..vectors.len()).map(entity).collect();
    let entries = entries_from_store(&store, &ids, EmbeddingKind::Complex);
    let index = ExactIndex::build(EmbeddingKind::Complex, entries).unwrap();
    EmbeddingMeasure::new(EmbeddingKind::Complex, store).with_index(Arc::new(index))
}

/// A small ontology rooted at `n0` with random parents and vectors in two
/// embedding families.
#[derive(Debug, Clone)]
struct World {
    complex: Vec<Vec<f32>>,
    node2vec: Vec<Vec<f32>>,
    parents: Vec<usize>,
}

fn arb_world() -> impl Strategy<Value = World> {
    (
        arb_vectors(NODES),
        arb_vectors(NODES),
        prop::collection::vec(0usize..NODES, NODES),
    )
        .prop_map(|(complex, node2vec, parents)| World {
            complex,
            node2vec,
            parents,
        })
}

impl World {
    fn engine(&self) -> SimilarityEngine {
        let mut builder = InMemoryKnowledgeGraph::builder();
        for i in 0..NODES {
            builder = builder
                .embedding(&node(i), EmbeddingKind::Complex, self.complex[i].clone())
                .embedding(&node(i), EmbeddingKind::Node2vec, self.node2vec[i].clone())
                .class_count(&node(i), (NODES - i) as u64 * 10);
            if i > 0 {
                builder = builder.subclass(&node(i), &node(self.parents[i] % i));
            }
        }
        let mut config = KgSimConfig::default();
        config.ontology.root_class = node(0);
        config.topsim.top_n = 4;
        config.topsim.first_n = 3;
        config.topsim.k = 2;
        SimilarityEngine::builder(Arc::new(builder.build()), config)
            .index_entities((0..NODES).map(node).collect(), IndexStrategy::Exact)
            .build()
            .unwrap()
    }
}

fn all_pairs() -> Vec<(EntityId, EntityId)> {
    let mut pairs = Vec::new();
    for a in 0..NODES {
        for b in 0..NODES {
            pairs.push((node(a), node(b)));
        }
    }
    pairs.push((node(0), "ghost".to_string()));
    pairs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn top_k_excludes_self_and_respects_k(
        vectors in arb_vectors(ENTITIES),
        a in 0..ENTITIES,
        k in 0usize..30,
    ) {
        let measure = embedding_measure(&vectors);
        let top = measure.top_k(&entity(a), k).unwrap();
        prop_assert!(top.len() <= k);
        prop_assert!(top.iter().all(|n| n.entity != entity(a)));
        let distinct: HashSet<&str> = top.iter().map(|n| n.entity.as_str()).collect();
        prop_assert_eq!(distinct.len(), top.len());
        prop_assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn larger_pool_never_lowers_top_1(
        vectors in arb_vectors(ENTITIES),
        a in 0..ENTITIES,
        small in 1usize..10,
        extra in 0usize..20,
    ) {
        let measure = embedding_measure(&vectors);
        let narrow = measure.top_k_with_pool(&entity(a), 1, small).unwrap();
        let wide = measure.top_k_with_pool(&entity(a), 1, small + extra).unwrap();
        let best = |r: &[ScoredEntity]| r.first().map(|s| s.score).unwrap_or(0.0);
        prop_assert!(best(&wide) >= best(&narrow));
    }

    #[test]
    fn region_measures_are_symmetric_and_bounded(world in arb_world()) {
        let engine = world.engine();
        for name in ["topsim-gated", "topsim-blend"] {
            let measure = engine.registry().get(name).unwrap();
            let pairs = all_pairs();
            let batch = measure.batch_similarity(&pairs);
            for ((a, b), batched) in pairs.iter().zip(batch) {
                let ab = measure.similarity(a, b).unwrap();
                let ba = measure.similarity(b, a).unwrap();
                prop_assert_eq!(ab, ba, "{} not symmetric on ({}, {})", name, a, b);
                prop_assert_eq!(ab, batched);
                prop_assert!((0.0..=1.0).contains(&ab));
                if a == b {
                    prop_assert_eq!(ab, 1.0);
                }
            }
        }
    }

    #[test]
    fn regions_never_contain_their_node(world in arb_world(), i in 0..NODES) {
        let engine = world.engine();
        let regions = engine.registry().regions();
        let region = regions.region(&node(i)).unwrap();
        prop_assert!(region.len() <= regions.config().top_n);
        prop_assert!(region.iter().all(|m| m.entity != node(i)));
        prop_assert!(region.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
