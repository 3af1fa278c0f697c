//! SimilarityEngine over the golden graph.

use std::sync::Arc;

use kgsim_core::config::KgSimConfig;
use kgsim_core::errors::KgSimErrorCode;
use kgsim_core::EntityId;
use kgsim_retrieval::{IndexStrategy, PairOutcome, SimilarityEngine, TopKOutcome};
use test_fixtures::{golden_graph, GoldenGraph};

const TOLERANCE: f64 = 1e-6;

fn config(golden: &GoldenGraph) -> KgSimConfig {
    let mut config = KgSimConfig::default();
    config.ontology.root_class = golden.root.clone();
    config.cache.node_capacity = 10_000;
    config.cache.region_capacity = 10_000;
    config
}

fn engine(golden: &GoldenGraph, strategy: IndexStrategy) -> SimilarityEngine {
    SimilarityEngine::builder(Arc::new(golden.knowledge_graph()), config(golden))
        .index_entities(golden.entity_ids(), strategy)
        .paths(Arc::new(golden.path_backend()))
        .build()
        .unwrap()
}

fn pair(a: &str, b: &str) -> (EntityId, EntityId) {
    (a.to_string(), b.to_string())
}

#[test]
fn scored_pair_carries_labels() {
    let golden = golden_graph();
    let engine = engine(&golden, IndexStrategy::Exact);
    match engine.similarity("Q144", "Q146", "complex").unwrap() {
        PairOutcome::Scored {
            score,
            label_a,
            label_b,
            ..
        } => {
            let want = golden.expected_score("complex", "Q144", "Q146").unwrap();
            assert!((score - want).abs() < TOLERANCE);
            assert_eq!(label_a.as_deref(), Some("dog"));
            assert_eq!(label_b.as_deref(), Some("cat"));
        }
        other => panic!("expected a score, got {other:?}"),
    }
}

#[test]
fn missing_data_is_not_present_rather_than_zero() {
    let golden = golden_graph();
    let engine = engine(&golden, IndexStrategy::Exact);
    let text = engine.similarity("Q144", "Q11442", "text").unwrap();
    assert_eq!(
        text,
        PairOutcome::NotPresent {
            a: "Q144".to_string(),
            b: "Q11442".to_string(),
            missing: vec!["Q11442".to_string()],
        }
    );
    assert_eq!(text.score(), None);
    let unknown = engine.similarity("Q144", "Q999999", "class").unwrap();
    assert!(matches!(unknown, PairOutcome::NotPresent { missing, .. } if missing == vec!["Q999999".to_string()]));
    // The batch path scores the same pair as 0.0.
    let batch = engine
        .batch_similarity(&[pair("Q144", "Q11442")], "text")
        .unwrap();
    assert_eq!(batch, vec![0.0]);
}

#[test]
fn known_entity_without_class_data_is_incomparable() {
    let golden = golden_graph();
    let engine = engine(&golden, IndexStrategy::Exact);
    // Q4115189 has a label but no class data.
    let err = engine.similarity("Q4115189", "Q144", "class").unwrap_err();
    assert_eq!(err.error_code(), "INCOMPARABLE_DATA");
    let err = engine.similarity("Q144", "Q4115189", "class").unwrap_err();
    assert_eq!(err.error_code(), "INCOMPARABLE_DATA");
    let batch = engine
        .batch_similarity(&[pair("Q4115189", "Q144")], "class")
        .unwrap();
    assert_eq!(batch, vec![0.0]);
}

#[test]
fn unknown_measure_is_a_structured_error() {
    let golden = golden_graph();
    let engine = engine(&golden, IndexStrategy::Exact);
    let err = engine.similarity("Q144", "Q146", "cosine").unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_MEASURE");
    assert!(engine.top_k("Q144", "cosine", None).is_err());
}

#[test]
fn measure_names_are_case_insensitive() {
    let golden = golden_graph();
    let engine = engine(&golden, IndexStrategy::Exact);
    let lower = engine.similarity("Q144", "Q146", "jc").unwrap();
    let upper = engine.similarity("Q144", "Q146", " JC ").unwrap();
    assert_eq!(lower, upper);
}

#[test]
fn top_k_excludes_the_query_and_is_ranked() {
    let golden = golden_graph();
    for strategy in [IndexStrategy::Exact, IndexStrategy::Hnsw] {
        let engine = engine(&golden, strategy);
        let outcome = engine.top_k("Q144", "complex", Some(3)).unwrap();
        let neighbors = outcome.neighbors();
        assert!(!neighbors.is_empty());
        assert!(neighbors.len() <= 3);
        assert!(neighbors.iter().all(|n| n.entity != "Q144"));
        assert!(neighbors.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(neighbors[0].entity, "Q146");
        assert_eq!(neighbors[0].label.as_deref(), Some("cat"));
    }
}

#[test]
fn top_k_for_entity_without_vector_is_not_present() {
    let golden = golden_graph();
    let engine = engine(&golden, IndexStrategy::Exact);
    assert_eq!(
        engine.top_k("Q4115189", "text", Some(5)).unwrap(),
        TopKOutcome::NotPresent {
            entity: "Q4115189".to_string()
        }
    );
    // Measures without an index path return no neighbors.
    assert!(engine.top_k("Q144", "jc", Some(5)).unwrap().neighbors().is_empty());
}

#[test]
fn score_table_has_one_column_per_measure() {
    let golden = golden_graph();
    let engine = engine(&golden, IndexStrategy::Exact);
    let pairs = vec![pair("Q144", "Q146"), pair("Q144", "Q1420")];
    let table = engine.score_table(&pairs, &["complex", "jc", "class"]).unwrap();
    assert_eq!(table.measures, vec!["complex", "jc", "class"]);
    assert_eq!(table.rows.len(), 2);
    for (row, (a, b)) in table.rows.iter().zip(&pairs) {
        assert_eq!(row.scores.len(), 3);
        for (measure, score) in table.measures.iter().zip(&row.scores) {
            let want = golden.expected_score(measure, a, b).unwrap();
            assert!((score - want).abs() < TOLERANCE, "{measure}({a}, {b})");
        }
    }
    assert_eq!(table.rows[1].label_b.as_deref(), Some("car"));
    assert!(engine.score_table(&pairs, &["complex", "nope"]).is_err());
}

#[test]
fn region_measures_on_golden_pairs() {
    let golden = golden_graph();
    let engine = engine(&golden, IndexStrategy::Exact);
    let combo = engine.similarity("Q144", "Q146", "combo-mean").unwrap().score().unwrap();
    let gated = engine.similarity("Q144", "Q146", "topsim-gated").unwrap().score().unwrap();
    // Siblings share a parent, so each is in the other's ontology candidates.
    assert_eq!(gated, combo);

    let blend = engine.registry().get("topsim-blend").unwrap();
    assert_eq!(blend.similarity("Q144", "Q144").unwrap(), 1.0);
    let ab = blend.similarity("Q144", "Q146").unwrap();
    assert_eq!(ab, blend.similarity("Q146", "Q144").unwrap());
    assert!((0.0..=1.0).contains(&ab));

    let region = engine.registry().regions().region("Q144").unwrap();
    assert!(region.iter().all(|m| m.entity != "Q144"));
    assert!(region.iter().any(|m| m.entity == "Q146"));
}

#[test]
fn explanation_and_paths_pass_through() {
    let golden = golden_graph();
    let engine = engine(&golden, IndexStrategy::Exact);
    let explanation = engine.explain_jc("Q144", "Q146").unwrap();
    assert_eq!(explanation.subsumers.len(), 2);

    let paths = engine.paths("Q144", "Q35120", 3).unwrap();
    assert_eq!(
        paths,
        vec![
            vec!["Q144".to_string(), "Q39201".to_string(), "Q35120".to_string()],
            vec![
                "Q144".to_string(),
                "Q7377".to_string(),
                "Q729".to_string(),
                "Q35120".to_string()
            ],
        ]
    );

    let bare = SimilarityEngine::builder(Arc::new(golden.knowledge_graph()), config(&golden))
        .build()
        .unwrap();
    assert!(bare.paths("Q144", "Q35120", 3).unwrap().is_empty());
    // Without indexes there is nothing to rank against.
    assert!(bare.top_k("Q144", "complex", None).unwrap().neighbors().is_empty());
}

#[test]
fn invalid_config_fails_the_build() {
    let golden = golden_graph();
    let mut bad = config(&golden);
    bad.retrieval.pool_factor = 0;
    let err = SimilarityEngine::builder(Arc::new(golden.knowledge_graph()), bad)
        .build()
        .err()
        .unwrap();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}
