use kgsim_core::config::ObservabilityConfig;
use kgsim_observability::{events, init_from_config, init_tracing_with_filter};

#[test]
fn init_is_idempotent_and_events_do_not_panic() {
    let config = ObservabilityConfig {
        log_level: "debug".to_string(),
        json: false,
    };
    init_from_config(&config);
    // A subscriber is installed now, so a second install fails quietly.
    assert!(!init_from_config(&config));
    init_tracing_with_filter("warn");

    events::backend_fetch("embedding:complex", 3, 12);
    events::backend_failure("class_count", "timeout");
    events::cache_preloaded("/tmp/records.json", 10);
    events::index_built("hnsw", 100, 8);
    events::top_k_completed("complex", "Q42", 100, 20);
    events::region_computed("Q42", 150, 20);
    events::registry_ready(&["complex".to_string(), "jc".to_string()]);
}
