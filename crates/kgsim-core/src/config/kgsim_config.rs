//! Top-level kgsim configuration with layered resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    BackendConfig, CacheConfig, CompositeConfig, ObservabilityConfig, OntologyConfig,
    RetrievalConfig, SubsumerAggregation, TopSimConfig, WeightedSplitConfig,
};
use crate::constants::{CONFIG_FILENAME, ENV_PREFIX};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`KGSIM_*`)
/// 2. Project config (`kgsim.toml` in the given root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KgSimConfig {
    pub backend: BackendConfig,
    pub cache: CacheConfig,
    pub retrieval: RetrievalConfig,
    pub topsim: TopSimConfig,
    pub composite: CompositeConfig,
    pub ontology: OntologyConfig,
    pub observability: ObservabilityConfig,
}

impl KgSimConfig {
    /// Load configuration with layered resolution from `root`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let project_config_path = root.join(CONFIG_FILENAME);
        let mut config = if project_config_path.exists() {
            Self::from_file(&project_config_path)?
        } else {
            Self::default()
        };

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys take their compiled defaults and
    /// unknown keys are ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the effective configuration back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment overrides read through `lookup`.
    /// Pattern: `KGSIM_BACKEND_WORKERS`, `KGSIM_RETRIEVAL_POOL_FACTOR`, etc.
    /// Unparseable values are ignored.
    pub fn apply_env_overrides<F>(config: &mut KgSimConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        set_parsed(&mut config.backend.workers, var("BACKEND_WORKERS"));
        set_parsed(&mut config.backend.queue_capacity, var("BACKEND_QUEUE_CAPACITY"));
        set_parsed(&mut config.cache.node_capacity, var("CACHE_NODE_CAPACITY"));
        set_parsed(&mut config.cache.node_idle_secs, var("CACHE_NODE_IDLE_SECS"));
        set_parsed(&mut config.cache.region_capacity, var("CACHE_REGION_CAPACITY"));
        if let Some(path) = var("CACHE_PRELOAD_PATH") {
            config.cache.preload_path = Some(path);
        }
        set_parsed(&mut config.retrieval.pool_factor, var("RETRIEVAL_POOL_FACTOR"));
        set_parsed(&mut config.retrieval.default_k, var("RETRIEVAL_DEFAULT_K"));
        set_parsed(&mut config.retrieval.ef_search, var("RETRIEVAL_EF_SEARCH"));
        set_parsed(&mut config.topsim.max_up, var("TOPSIM_MAX_UP"));
        set_parsed(&mut config.topsim.max_down, var("TOPSIM_MAX_DOWN"));
        set_parsed(&mut config.topsim.top_n, var("TOPSIM_TOP_N"));
        set_parsed(&mut config.topsim.first_n, var("TOPSIM_FIRST_N"));
        set_parsed(&mut config.topsim.k, var("TOPSIM_K"));
        if let Some(measure) = var("TOPSIM_MEASURE") {
            config.topsim.measure = measure;
        }
        if let Some(root) = var("ONTOLOGY_ROOT_CLASS") {
            config.ontology.root_class = root;
        }
        if let Some(agg) = var("ONTOLOGY_SUBSUMER_AGGREGATION") {
            match agg.trim().to_ascii_lowercase().as_str() {
                "max" => config.ontology.subsumer_aggregation = SubsumerAggregation::Max,
                "parallel_resistor" => {
                    config.ontology.subsumer_aggregation = SubsumerAggregation::ParallelResistor
                }
                _ => {}
            }
        }
        if let Some(level) = var("LOG_LEVEL") {
            config.observability.log_level = level;
        }
        set_parsed(&mut config.observability.json, var("LOG_JSON"));
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.workers == 0 {
            return Err(ConfigError::invalid("backend.workers", "must be at least 1"));
        }
        if self.backend.queue_capacity == 0 {
            return Err(ConfigError::invalid("backend.queue_capacity", "must be at least 1"));
        }
        if self.cache.node_capacity == 0 {
            return Err(ConfigError::invalid("cache.node_capacity", "must be greater than 0"));
        }
        if self.cache.region_capacity == 0 {
            return Err(ConfigError::invalid("cache.region_capacity", "must be greater than 0"));
        }
        if self.retrieval.pool_factor == 0 {
            return Err(ConfigError::invalid("retrieval.pool_factor", "must be at least 1"));
        }
        if self.retrieval.default_k == 0 {
            return Err(ConfigError::invalid("retrieval.default_k", "must be at least 1"));
        }
        if self.topsim.top_n == 0 {
            return Err(ConfigError::invalid("topsim.top_n", "must be at least 1"));
        }
        if self.topsim.measure.trim().is_empty() {
            return Err(ConfigError::invalid("topsim.measure", "must name a measure"));
        }
        if self.ontology.root_class.trim().is_empty() {
            return Err(ConfigError::invalid("ontology.root_class", "must not be empty"));
        }
        for (field, split) in [
            ("composite.max_split", &self.composite.max_split),
            ("composite.mean_split", &self.composite.mean_split),
        ] {
            validate_split(field, split)?;
        }
        Ok(())
    }
}

fn validate_split(field: &str, split: &WeightedSplitConfig) -> Result<(), ConfigError> {
    let weights = [split.embedding_weight, split.ontology_weight];
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(ConfigError::invalid(field, "weights must be finite and non-negative"));
    }
    Ok(())
}

fn set_parsed<T: FromStr>(target: &mut T, value: Option<String>) {
    if let Some(parsed) = value.and_then(|v| v.trim().parse::<T>().ok()) {
        *target = parsed;
    }
}
