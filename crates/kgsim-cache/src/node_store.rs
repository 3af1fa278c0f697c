//! Cache-fronted view of the knowledge graph.
//!
//! Every per-node field goes through the node cache and reaches the backend
//! only on a miss. Misses are stored, including "nothing found", so a failed
//! lookup is not repeated. Backend errors are never cached.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use kgsim_core::config::KgSimConfig;
use kgsim_core::errors::{BackendResult, ConfigError};
use kgsim_core::ontology::ontology_neighbors;
use kgsim_core::traits::{IKnowledgeGraph, SharedGraph};
use kgsim_core::{ClassMembership, EmbeddingKind, EntityId, EntityRecord};
use kgsim_observability::events;

use crate::keys::{CachedField, FieldScope, NodeKey};
use crate::memo::MemoCache;
use crate::node_cache::{CacheStats, INodeCache, TieredNodeCache};

type SubsumerKey = (EntityId, EntityId);

pub struct NodeStore {
    graph: SharedGraph,
    cache: Arc<dyn INodeCache>,
    subsumers: MemoCache<SubsumerKey, Arc<HashSet<EntityId>>>,
}

impl NodeStore {
    pub fn new(graph: SharedGraph, cache: Arc<dyn INodeCache>, memo_capacity: u64) -> Self {
        Self {
            graph,
            cache,
            subsumers: MemoCache::new(memo_capacity),
        }
    }

    /// Store with a [`TieredNodeCache`] built from `config.cache`.
    pub fn from_config(graph: SharedGraph, config: &KgSimConfig) -> Result<Self, ConfigError> {
        let cache = TieredNodeCache::from_config(&config.cache)?;
        Ok(Self::new(graph, Arc::new(cache), config.cache.region_capacity))
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn cached<F>(&self, entity: &str, scope: FieldScope, fetch: F) -> BackendResult<CachedField>
    where
        F: FnOnce(&dyn IKnowledgeGraph) -> BackendResult<CachedField>,
    {
        let key = NodeKey::new(entity, scope);
        if let Some(value) = self.cache.get(&key) {
            return Ok(value);
        }
        let started = Instant::now();
        let value = fetch(self.graph.as_ref())?;
        events::backend_fetch(&scope.to_string(), 1, started.elapsed().as_millis());
        self.cache.put(key, value.clone());
        Ok(value)
    }

    pub fn label(&self, entity: &str) -> BackendResult<Option<String>> {
        self.cached(entity, FieldScope::Label, |g| Ok(g.label(entity)?.into()))
            .map(CachedField::into_label)
    }

    /// Labels for many entities. Failed lookups come back as `None`.
    pub fn labels(&self, entities: &[EntityId]) -> Vec<Option<String>> {
        entities
            .iter()
            .map(|e| {
                self.label(e).unwrap_or_else(|err| {
                    events::backend_failure("label", &err.to_string());
                    None
                })
            })
            .collect()
    }

    pub fn embedding(&self, entity: &str, kind: EmbeddingKind) -> BackendResult<Option<Arc<[f32]>>> {
        self.cached(entity, FieldScope::Embedding(kind), |g| {
            Ok(g.embedding(entity, kind)?.into())
        })
        .map(CachedField::into_embedding)
    }

    /// Positional bulk embedding lookup.
    ///
    /// Cached entries are served directly; the misses go to the backend in
    /// one bulk call. If the bulk call fails, misses are retried one by one
    /// and entities that still fail come back as `None` without being cached.
    pub fn embeddings(&self, entities: &[EntityId], kind: EmbeddingKind) -> Vec<Option<Arc<[f32]>>> {
        let scope = FieldScope::Embedding(kind);
        let mut resolved: Vec<Option<CachedField>> = entities
            .iter()
            .map(|e| self.cache.get(&NodeKey::new(e.as_str(), scope)))
            .collect();

        let mut missing: Vec<EntityId> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for (entity, value) in entities.iter().zip(&resolved) {
            if value.is_none() && seen.insert(entity.as_str()) {
                missing.push(entity.clone());
            }
        }

        if !missing.is_empty() {
            let started = Instant::now();
            let fetched: Vec<(EntityId, CachedField)> = match self.graph.embeddings(&missing, kind) {
                Ok(vectors) if vectors.len() == missing.len() => missing
                    .iter()
                    .cloned()
                    .zip(vectors.into_iter().map(CachedField::from))
                    .collect(),
                Ok(vectors) => {
                    events::backend_failure(
                        &scope.to_string(),
                        &format!("bulk result has {} entries for {} entities", vectors.len(), missing.len()),
                    );
                    self.fetch_each(&missing, kind)
                }
                Err(err) => {
                    events::backend_failure(&scope.to_string(), &err.to_string());
                    self.fetch_each(&missing, kind)
                }
            };
            events::backend_fetch(&scope.to_string(), missing.len(), started.elapsed().as_millis());

            let fetched: HashMap<EntityId, CachedField> = fetched.into_iter().collect();
            for (slot, entity) in resolved.iter_mut().zip(entities) {
                if slot.is_none() {
                    *slot = fetched.get(entity).cloned();
                }
            }
            for (entity, value) in fetched {
                self.cache.put(NodeKey::new(entity, scope), value);
            }
        }

        resolved
            .into_iter()
            .map(|v| v.and_then(CachedField::into_embedding))
            .collect()
    }

    fn fetch_each(&self, entities: &[EntityId], kind: EmbeddingKind) -> Vec<(EntityId, CachedField)> {
        entities
            .iter()
            .filter_map(|e| match self.graph.embedding(e, kind) {
                Ok(v) => Some((e.clone(), CachedField::from(v))),
                Err(err) => {
                    events::backend_failure("embedding", &err.to_string());
                    None
                }
            })
            .collect()
    }

    /// Parsed class membership of an entity.
    pub fn class_membership(&self, entity: &str) -> BackendResult<Option<Arc<ClassMembership>>> {
        self.cached(entity, FieldScope::ClassMembership, |g| {
            Ok(g.class_counts_compact(entity)?
                .map(|packed| ClassMembership::parse_compact(&packed))
                .into())
        })
        .map(CachedField::into_classes)
    }

    /// Transitive instance count of a class, 0 if unknown.
    pub fn class_count(&self, class: &str) -> BackendResult<u64> {
        self.cached(class, FieldScope::ClassCount, |g| {
            Ok(CachedField::Count(g.class_count(class)?))
        })
        .map(|v| v.into_count().unwrap_or(0))
    }

    pub fn ancestors(&self, entity: &str) -> BackendResult<Arc<HashSet<EntityId>>> {
        self.cached(entity, FieldScope::Ancestors, |g| {
            Ok(CachedField::Nodes(Arc::new(g.ancestors(entity)?)))
        })
        .map(CachedField::into_nodes)
    }

    pub fn descendants(&self, entity: &str) -> BackendResult<Arc<HashSet<EntityId>>> {
        self.cached(entity, FieldScope::Descendants, |g| {
            Ok(CachedField::Nodes(Arc::new(g.descendants(entity)?)))
        })
        .map(CachedField::into_nodes)
    }

    /// Most specific subsumers, memoized per unordered class pair.
    pub fn most_specific_subsumers(&self, c1: &str, c2: &str) -> BackendResult<Arc<HashSet<EntityId>>> {
        let key = if c1 <= c2 {
            (c1.to_string(), c2.to_string())
        } else {
            (c2.to_string(), c1.to_string())
        };
        self.subsumers.get_or_try_insert_with(key, || {
            self.graph.most_specific_subsumers(c1, c2).map(Arc::new)
        })
    }

    /// Ontology neighborhood: ancestors within `max_up` hops plus descendants
    /// within `max_down` hops of the node and of those ancestors.
    pub fn neighbors(&self, node: &str, max_up: usize, max_down: usize) -> BackendResult<HashSet<EntityId>> {
        ontology_neighbors(
            node,
            max_up,
            max_down,
            |c| self.ancestors(c).map(|s| (*s).clone()),
            |c| self.descendants(c).map(|s| (*s).clone()),
        )
    }

    /// Assemble the cached per-entity record for the given embedding kinds.
    pub fn record(&self, entity: &str, kinds: &[EmbeddingKind]) -> BackendResult<EntityRecord> {
        let mut record = EntityRecord::new(entity);
        record.label = self.label(entity)?;
        for kind in kinds {
            if let Some(v) = self.embedding(entity, *kind)? {
                record.embeddings.insert(*kind, v.to_vec());
            }
        }
        record.classes = self.class_membership(entity)?.map(|c| (*c).clone());
        Ok(record)
    }
}
