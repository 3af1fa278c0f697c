//! SimilarityEngine: the facade a request layer calls.
//!
//! Resolves measure names through the registry, reports missing inputs as
//! "not present" outcomes instead of 0.0, attaches labels, and owns the
//! optional path backend.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use kgsim_cache::{CacheStats, INodeCache, NodeStore};
use kgsim_core::config::{KgSimConfig, RetrievalConfig};
use kgsim_core::errors::{KgSimResult, MeasureError};
use kgsim_core::traits::{IPathBackend, IVectorIndex, SharedGraph};
use kgsim_core::{EmbeddingKind, EntityId};
use kgsim_measures::{JcExplanation, MeasureRef};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::index::{entries_from_store, ExactIndex, HnswIndex};
use crate::registry::MeasureRegistry;

/// Result of scoring one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairOutcome {
    Scored {
        a: EntityId,
        b: EntityId,
        score: f64,
        label_a: Option<String>,
        label_b: Option<String>,
    },
    /// The measure has no data for the listed entities.
    NotPresent {
        a: EntityId,
        b: EntityId,
        missing: Vec<EntityId>,
    },
}

impl PairOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Scored { score, .. } => Some(*score),
            Self::NotPresent { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledNeighbor {
    pub entity: EntityId,
    pub score: f64,
    pub label: Option<String>,
}

/// Result of a top-k request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TopKOutcome {
    Ranked {
        entity: EntityId,
        neighbors: Vec<LabeledNeighbor>,
    },
    NotPresent {
        entity: EntityId,
    },
}

impl TopKOutcome {
    /// Ranked neighbors, empty when the entity is not present.
    pub fn neighbors(&self) -> &[LabeledNeighbor] {
        match self {
            Self::Ranked { neighbors, .. } => neighbors,
            Self::NotPresent { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRow {
    pub a: EntityId,
    pub b: EntityId,
    pub label_a: Option<String>,
    pub label_b: Option<String>,
    /// One score per measure, in [`ScoreTable::measures`] order.
    pub scores: Vec<f64>,
}

/// A pair table scored under several measures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTable {
    pub measures: Vec<String>,
    pub rows: Vec<ScoreRow>,
}

/// Which adapter [`SimilarityEngineBuilder::index_entities`] builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStrategy {
    Exact,
    Hnsw,
}

pub struct SimilarityEngineBuilder {
    graph: SharedGraph,
    config: KgSimConfig,
    cache: Option<Arc<dyn INodeCache>>,
    indexes: HashMap<EmbeddingKind, Arc<dyn IVectorIndex>>,
    universe: Option<(Vec<EntityId>, IndexStrategy)>,
    paths: Option<Arc<dyn IPathBackend>>,
}

impl SimilarityEngineBuilder {
    /// Replace the config-built tiered cache, e.g. with a no-op cache.
    pub fn cache(mut self, cache: Arc<dyn INodeCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use a prebuilt vector index for `kind`.
    pub fn index(mut self, kind: EmbeddingKind, index: Arc<dyn IVectorIndex>) -> Self {
        self.indexes.insert(kind, index);
        self
    }

    /// Build an index per embedding kind over `entities` at build time.
    /// Kinds with an explicit [`index`](Self::index) keep it; kinds no entity
    /// has a vector for get none.
    pub fn index_entities(mut self, entities: Vec<EntityId>, strategy: IndexStrategy) -> Self {
        self.universe = Some((entities, strategy));
        self
    }

    pub fn paths(mut self, backend: Arc<dyn IPathBackend>) -> Self {
        self.paths = Some(backend);
        self
    }

    pub fn build(self) -> KgSimResult<SimilarityEngine> {
        let Self {
            graph,
            config,
            cache,
            mut indexes,
            universe,
            paths,
        } = self;
        config.validate()?;

        let store = Arc::new(match cache {
            Some(cache) => NodeStore::new(graph, cache, config.cache.region_capacity),
            None => NodeStore::from_config(graph, &config)?,
        });

        if let Some((entities, strategy)) = universe {
            for kind in EmbeddingKind::ALL {
                if indexes.contains_key(&kind) {
                    continue;
                }
                let entries = entries_from_store(&store, &entities, kind);
                if entries.is_empty() {
                    debug!(kind = kind.as_str(), "no vectors, skipping index");
                    continue;
                }
                let index: Arc<dyn IVectorIndex> = match strategy {
                    IndexStrategy::Exact => Arc::new(ExactIndex::build(kind, entries)?),
                    IndexStrategy::Hnsw => Arc::new(HnswIndex::build(kind, entries, &config.retrieval)?),
                };
                indexes.insert(kind, index);
            }
        }

        let registry = MeasureRegistry::build(Arc::clone(&store), &indexes, &config)?;
        info!(
            measures = registry.names().len(),
            indexes = indexes.len(),
            paths = paths.is_some(),
            "similarity engine ready"
        );
        Ok(SimilarityEngine {
            store,
            registry,
            paths,
            retrieval: config.retrieval,
        })
    }
}

pub struct SimilarityEngine {
    store: Arc<NodeStore>,
    registry: MeasureRegistry,
    paths: Option<Arc<dyn IPathBackend>>,
    retrieval: RetrievalConfig,
}

impl SimilarityEngine {
    pub fn builder(graph: SharedGraph, config: KgSimConfig) -> SimilarityEngineBuilder {
        SimilarityEngineBuilder {
            graph,
            config,
            cache: None,
            indexes: HashMap::new(),
            universe: None,
            paths: None,
        }
    }

    pub fn registry(&self) -> &MeasureRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<NodeStore> {
        &self.store
    }

    pub fn measure(&self, name: &str) -> KgSimResult<MeasureRef> {
        Ok(self.registry.get(name)?)
    }

    /// Score one pair. Missing inputs give [`PairOutcome::NotPresent`];
    /// incomparable data and backend failures are errors.
    pub fn similarity(&self, a: &str, b: &str, measure: &str) -> KgSimResult<PairOutcome> {
        let measure = self.measure(measure)?;
        let both = [a, b];
        let entities = if a == b { &both[..1] } else { &both[..] };
        let missing = measure.missing_inputs(entities)?;
        let not_present = |missing: Vec<EntityId>| PairOutcome::NotPresent {
            a: a.to_string(),
            b: b.to_string(),
            missing,
        };
        if !missing.is_empty() {
            debug!(measure = measure.name(), a, b, ?missing, "pair not present");
            return Ok(not_present(missing));
        }
        let score = match measure.similarity(a, b) {
            Ok(score) => score,
            Err(MeasureError::MissingEntity { entity, .. }) => return Ok(not_present(vec![entity])),
            Err(e) => return Err(e.into()),
        };
        Ok(PairOutcome::Scored {
            a: a.to_string(),
            b: b.to_string(),
            score,
            label_a: self.store.label(a)?,
            label_b: self.store.label(b)?,
        })
    }

    /// Score many pairs. Failed pairs score 0.0.
    pub fn batch_similarity(&self, pairs: &[(EntityId, EntityId)], measure: &str) -> KgSimResult<Vec<f64>> {
        Ok(self.measure(measure)?.batch_similarity(pairs))
    }

    /// Best `k` neighbors of `entity` (default k from the retrieval config).
    pub fn top_k(&self, entity: &str, measure: &str, k: Option<usize>) -> KgSimResult<TopKOutcome> {
        let measure = self.measure(measure)?;
        let k = k.unwrap_or(self.retrieval.default_k);
        let ranked = match measure.top_k(entity, k) {
            Ok(ranked) => ranked,
            Err(MeasureError::MissingEntity { .. }) => {
                return Ok(TopKOutcome::NotPresent {
                    entity: entity.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let ids: Vec<EntityId> = ranked.iter().map(|r| r.entity.clone()).collect();
        let neighbors: Vec<LabeledNeighbor> = ranked
            .into_iter()
            .zip(self.store.labels(&ids))
            .map(|(r, label)| LabeledNeighbor {
                entity: r.entity,
                score: r.score,
                label,
            })
            .collect();
        info!(measure = measure.name(), entity, k, returned = neighbors.len(), "top-k served");
        Ok(TopKOutcome::Ranked {
            entity: entity.to_string(),
            neighbors,
        })
    }

    /// Score `pairs` under every named measure. Every name is resolved before
    /// any scoring happens.
    pub fn score_table(&self, pairs: &[(EntityId, EntityId)], measures: &[&str]) -> KgSimResult<ScoreTable> {
        let resolved: Vec<MeasureRef> = measures
            .iter()
            .map(|name| self.registry.get(name))
            .collect::<Result<_, _>>()?;
        let columns: Vec<Vec<f64>> = resolved
            .par_iter()
            .map(|m| m.batch_similarity(pairs))
            .collect();

        let mut seen: HashSet<&str> = HashSet::new();
        let distinct: Vec<EntityId> = pairs
            .iter()
            .flat_map(|(a, b)| [a, b])
            .filter(|e| seen.insert(e.as_str()))
            .cloned()
            .collect();
        let labels: HashMap<EntityId, Option<String>> = distinct
            .iter()
            .cloned()
            .zip(self.store.labels(&distinct))
            .collect();
        let label = |e: &EntityId| labels.get(e).cloned().flatten();

        let rows = pairs
            .iter()
            .enumerate()
            .map(|(i, (a, b))| ScoreRow {
                a: a.clone(),
                b: b.clone(),
                label_a: label(a),
                label_b: label(b),
                scores: columns
                    .iter()
                    .map(|c| c.get(i).copied().unwrap_or(0.0))
                    .collect(),
            })
            .collect();
        info!(pairs = pairs.len(), measures = resolved.len(), "score table computed");
        Ok(ScoreTable {
            measures: resolved.iter().map(|m| m.name().to_string()).collect(),
            rows,
        })
    }

    /// Per-subsumer breakdown of the Jiang-Conrath score of two classes.
    pub fn explain_jc(&self, c1: &str, c2: &str) -> KgSimResult<JcExplanation> {
        Ok(self.registry.jiang_conrath().explain(c1, c2)?)
    }

    /// Simple paths of at most `max_hops` edges, or none without a path
    /// backend.
    pub fn paths(&self, source: &str, target: &str, max_hops: usize) -> KgSimResult<Vec<Vec<EntityId>>> {
        match &self.paths {
            Some(backend) => Ok(backend.paths(source, target, max_hops)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.store.cache_stats()
    }
}
