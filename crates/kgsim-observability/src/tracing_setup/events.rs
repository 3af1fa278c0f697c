//! Structured log events for key engine operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a backend fetch that missed the cache.
pub fn backend_fetch(field: &str, entities: usize, elapsed_ms: u128) {
    tracing::debug!(
        event = "backend_fetch",
        field = %field,
        entities = entities,
        elapsed_ms = elapsed_ms as u64,
        "backend fetch"
    );
}

/// Log a backend failure that was absorbed by a batch.
pub fn backend_failure(field: &str, error: &str) {
    tracing::warn!(
        event = "backend_failure",
        field = %field,
        error = %error,
        "backend fetch failed"
    );
}

/// Log the preloaded cache tier being loaded.
pub fn cache_preloaded(path: &str, records: usize) {
    tracing::info!(
        event = "cache_preloaded",
        path = %path,
        records = records,
        "preloaded cache tier loaded"
    );
}

/// Log a vector index becoming ready.
pub fn index_built(kind: &str, entries: usize, dimensions: usize) {
    tracing::info!(
        event = "index_built",
        kind = %kind,
        entries = entries,
        dimensions = dimensions,
        "vector index ready"
    );
}

/// Log a top-k retrieval.
pub fn top_k_completed(measure: &str, entity: &str, pool: usize, returned: usize) {
    tracing::debug!(
        event = "top_k_completed",
        measure = %measure,
        entity = %entity,
        pool = pool,
        returned = returned,
        "top-k retrieval completed"
    );
}

/// Log a top-similarity region computation (cache miss).
pub fn region_computed(entity: &str, candidates: usize, region: usize) {
    tracing::debug!(
        event = "region_computed",
        entity = %entity,
        candidates = candidates,
        region = region,
        "top-similarity region computed"
    );
}

/// Log the measure registry being assembled.
pub fn registry_ready(measures: &[String]) {
    tracing::info!(
        event = "registry_ready",
        measures = ?measures,
        "similarity measures registered"
    );
}
