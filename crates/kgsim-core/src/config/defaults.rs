// Single source of truth for all default values.

// --- Backend ---
pub const DEFAULT_BACKEND_WORKERS: usize = 1;
pub const DEFAULT_BACKEND_QUEUE_CAPACITY: usize = 1_024;

// --- Cache ---
pub const DEFAULT_NODE_CACHE_CAPACITY: u64 = 250_000;
pub const DEFAULT_NODE_CACHE_IDLE_SECS: u64 = 3_600; // 1 hour
pub const DEFAULT_REGION_CACHE_CAPACITY: u64 = 250_000;

// --- Retrieval ---
pub const DEFAULT_POOL_FACTOR: usize = 5;
pub const DEFAULT_TOP_K: usize = 20;
pub const DEFAULT_EF_SEARCH: usize = 400;
pub const DEFAULT_HNSW_MAX_CONNECTIONS: usize = 16;
pub const DEFAULT_HNSW_EF_CONSTRUCTION: usize = 200;
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

// --- TopSim ---
pub const DEFAULT_TOPSIM_MAX_UP: usize = 1;
pub const DEFAULT_TOPSIM_MAX_DOWN: usize = 1;
pub const DEFAULT_TOPSIM_TOP_N: usize = 20;
pub const DEFAULT_TOPSIM_FIRST_N: usize = 100;
pub const DEFAULT_TOPSIM_BLEND_K: usize = 5;
pub const DEFAULT_TOPSIM_MEASURE: &str = "combo-mean";

// --- Composite ---
pub const DEFAULT_MAX_SPLIT_WEIGHTS: (f64, f64) = (0.4, 0.6);
pub const DEFAULT_MEAN_SPLIT_WEIGHTS: (f64, f64) = (0.5, 0.5);

// --- Ontology ---
pub const DEFAULT_DEFAULT_CLASS_COUNT: u64 = 1;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
