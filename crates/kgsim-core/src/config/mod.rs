//! Configuration system for kgsim.
//! TOML-based, layered resolution: env > project file > compiled defaults.

pub mod backend_config;
pub mod cache_config;
pub mod composite_config;
pub mod defaults;
pub mod kgsim_config;
pub mod observability_config;
pub mod ontology_config;
pub mod retrieval_config;
pub mod topsim_config;

pub use backend_config::BackendConfig;
pub use cache_config::CacheConfig;
pub use composite_config::{CompositeConfig, WeightedSplitConfig};
pub use kgsim_config::KgSimConfig;
pub use observability_config::ObservabilityConfig;
pub use ontology_config::{OntologyConfig, SubsumerAggregation};
pub use retrieval_config::RetrievalConfig;
pub use topsim_config::TopSimConfig;
