use std::sync::Arc;

use kgsim_cache::{NodeStore, TieredNodeCache};
use kgsim_core::traits::IKnowledgeGraph;
use kgsim_core::EmbeddingKind;
use proptest::prelude::*;
use test_fixtures::{golden_graph, CountingGraph};

#[derive(Debug, Clone)]
enum Lookup {
    Label(usize),
    Embedding(usize, EmbeddingKind),
    Bulk(Vec<usize>, EmbeddingKind),
    Count(usize),
    Ancestors(usize),
}

fn arb_kind() -> impl Strategy<Value = EmbeddingKind> {
    prop_oneof![
        Just(EmbeddingKind::Complex),
        Just(EmbeddingKind::Transe),
        Just(EmbeddingKind::Text),
        Just(EmbeddingKind::Node2vec),
    ]
}

fn arb_lookup() -> impl Strategy<Value = Lookup> {
    prop_oneof![
        (0usize..32).prop_map(Lookup::Label),
        (0usize..32, arb_kind()).prop_map(|(i, k)| Lookup::Embedding(i, k)),
        (proptest::collection::vec(0usize..32, 0..10), arb_kind()).prop_map(|(v, k)| Lookup::Bulk(v, k)),
        (0usize..32).prop_map(Lookup::Count),
        (0usize..32).prop_map(Lookup::Ancestors),
    ]
}

// ── Cached answers equal backend answers, at any capacity ───────────────

proptest! {
    #[test]
    fn store_is_transparent(capacity in 1u64..64, lookups in proptest::collection::vec(arb_lookup(), 1..60)) {
        let golden = golden_graph();
        let direct = golden.knowledge_graph();
        let mut ids = golden.entity_ids();
        ids.push("Q_unknown".to_string());
        let id = |i: usize| ids[i % ids.len()].clone();

        let store = NodeStore::new(
            Arc::new(CountingGraph::new(direct.clone())),
            Arc::new(TieredNodeCache::new(capacity, 0)),
            capacity,
        );

        for lookup in lookups {
            match lookup {
                Lookup::Label(i) => {
                    prop_assert_eq!(store.label(&id(i)).unwrap(), direct.label(&id(i)).unwrap());
                }
                Lookup::Embedding(i, kind) => {
                    let cached = store.embedding(&id(i), kind).unwrap().map(|v| v.to_vec());
                    prop_assert_eq!(cached, direct.embedding(&id(i), kind).unwrap());
                }
                Lookup::Bulk(idx, kind) => {
                    let batch: Vec<String> = idx.iter().map(|i| id(*i)).collect();
                    let cached: Vec<Option<Vec<f32>>> = store
                        .embeddings(&batch, kind)
                        .into_iter()
                        .map(|v| v.map(|v| v.to_vec()))
                        .collect();
                    prop_assert_eq!(cached, direct.embeddings(&batch, kind).unwrap());
                }
                Lookup::Count(i) => {
                    prop_assert_eq!(store.class_count(&id(i)).unwrap(), direct.class_count(&id(i)).unwrap());
                }
                Lookup::Ancestors(i) => {
                    prop_assert_eq!((*store.ancestors(&id(i)).unwrap()).clone(), direct.ancestors(&id(i)).unwrap());
                }
            }
        }
    }

    #[test]
    fn repeated_lookups_never_refetch_with_room(i in 0usize..16, repeats in 2usize..6) {
        let golden = golden_graph();
        let ids = golden.entity_ids();
        let entity = ids[i % ids.len()].clone();
        let counting = CountingGraph::new(golden.knowledge_graph());
        let store = NodeStore::new(
            Arc::new(counting.clone()),
            Arc::new(TieredNodeCache::new(1_000, 0)),
            1_000,
        );
        for _ in 0..repeats {
            store.label(&entity).unwrap();
            store.class_membership(&entity).unwrap();
        }
        prop_assert_eq!(counting.calls("label"), 1);
        prop_assert_eq!(counting.calls("class_counts_compact"), 1);
    }
}
