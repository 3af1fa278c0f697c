//! Memoized top-similarity regions.
//!
//! A node's region is the `top_n` of its candidate pool under the scoring
//! measure. Pools and regions are memoized per `(node, TopSimConfig)`; two
//! threads missing the same key both compute and store an identical value.
//!
//! The scorer is fixed at construction. The `measure` field of a config passed
//! to the `*_with` methods is replaced by the scorer's name before keying.

use std::sync::Arc;

use kgsim_cache::MemoCache;
use kgsim_core::config::TopSimConfig;
use kgsim_core::errors::MeasureResult;
use kgsim_core::models::entity::sort_ranked;
use kgsim_core::{EntityId, ScoredEntity};
use kgsim_measures::MeasureRef;
use kgsim_observability::events;

use crate::candidates::CandidateGenerator;

type RegionKey = (EntityId, TopSimConfig);

pub struct TopSimRegions {
    generator: CandidateGenerator,
    scorer: MeasureRef,
    config: TopSimConfig,
    pools: MemoCache<RegionKey, Arc<Vec<EntityId>>>,
    regions: MemoCache<RegionKey, Arc<Vec<ScoredEntity>>>,
}

impl TopSimRegions {
    pub fn new(
        generator: CandidateGenerator,
        scorer: MeasureRef,
        config: TopSimConfig,
        capacity: u64,
    ) -> Self {
        Self {
            generator,
            scorer,
            config,
            pools: MemoCache::new(capacity),
            regions: MemoCache::new(capacity),
        }
    }

    fn key(&self, node: &str, config: &TopSimConfig) -> RegionKey {
        let mut config = config.clone();
        config.measure = self.scorer.name().to_string();
        (node.to_string(), config)
    }

    pub fn config(&self) -> &TopSimConfig {
        &self.config
    }

    /// The measure regions are ranked by.
    pub fn scorer(&self) -> &MeasureRef {
        &self.scorer
    }

    pub fn candidates(&self, node: &str) -> MeasureResult<Arc<Vec<EntityId>>> {
        self.candidates_with(node, &self.config)
    }

    pub fn candidates_with(&self, node: &str, config: &TopSimConfig) -> MeasureResult<Arc<Vec<EntityId>>> {
        self.pools
            .get_or_try_insert_with(self.key(node, config), || {
                self.generator.candidates(node, config).map(Arc::new)
            })
    }

    /// Region of `node` under the configured parameters, best first.
    pub fn region(&self, node: &str) -> MeasureResult<Arc<Vec<ScoredEntity>>> {
        self.region_with(node, &self.config)
    }

    pub fn region_with(&self, node: &str, config: &TopSimConfig) -> MeasureResult<Arc<Vec<ScoredEntity>>> {
        self.regions
            .get_or_try_insert_with(self.key(node, config), || -> MeasureResult<_> {
                let candidates = self.candidates_with(node, config)?;
                let scores = self.scorer.similarity_to_many(node, &candidates);
                let mut ranked: Vec<ScoredEntity> = candidates
                    .iter()
                    .zip(scores)
                    .map(|(entity, score)| ScoredEntity::new(entity.clone(), score))
                    .collect();
                sort_ranked(&mut ranked);
                ranked.truncate(config.top_n);
                events::region_computed(node, candidates.len(), ranked.len());
                Ok(Arc::new(ranked))
            })
    }

    /// Whether `member` is in the region of `node`.
    pub fn contains(&self, node: &str, member: &str) -> MeasureResult<bool> {
        Ok(self.region(node)?.iter().any(|m| m.entity == member))
    }

    /// Memoized region count.
    pub fn len(&self) -> u64 {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.pools.clear();
        self.regions.clear();
    }
}
