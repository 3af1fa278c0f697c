use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use kgsim_core::{ClassMembership, EmbeddingKind, EntityId};

/// Which part of an entity's data a cache entry holds. Each scope is
/// fetched once and then frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldScope {
    Label,
    Embedding(EmbeddingKind),
    ClassMembership,
    ClassCount,
    Ancestors,
    Descendants,
}

impl fmt::Display for FieldScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label => f.write_str("label"),
            Self::Embedding(kind) => write!(f, "embedding:{kind}"),
            Self::ClassMembership => f.write_str("class_membership"),
            Self::ClassCount => f.write_str("class_count"),
            Self::Ancestors => f.write_str("ancestors"),
            Self::Descendants => f.write_str("descendants"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub entity: EntityId,
    pub scope: FieldScope,
}

impl NodeKey {
    pub fn new(entity: impl Into<EntityId>, scope: FieldScope) -> Self {
        Self {
            entity: entity.into(),
            scope,
        }
    }
}

/// A resolved cache value.
///
/// `Empty` is the "looked up, nothing found" sentinel; a cache miss (`None`
/// from [`crate::INodeCache::get`]) means "not looked up yet".
#[derive(Debug, Clone, PartialEq)]
pub enum CachedField {
    Empty,
    Label(Arc<str>),
    Embedding(Arc<[f32]>),
    Classes(Arc<ClassMembership>),
    Count(u64),
    Nodes(Arc<HashSet<EntityId>>),
}

impl CachedField {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn into_label(self) -> Option<String> {
        match self {
            Self::Label(label) => Some(label.to_string()),
            _ => None,
        }
    }

    pub fn into_embedding(self) -> Option<Arc<[f32]>> {
        match self {
            Self::Embedding(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_classes(self) -> Option<Arc<ClassMembership>> {
        match self {
            Self::Classes(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_count(self) -> Option<u64> {
        match self {
            Self::Count(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_nodes(self) -> Arc<HashSet<EntityId>> {
        match self {
            Self::Nodes(nodes) => nodes,
            _ => Arc::new(HashSet::new()),
        }
    }
}

impl From<Option<String>> for CachedField {
    fn from(label: Option<String>) -> Self {
        label.map_or(Self::Empty, |l| Self::Label(Arc::from(l)))
    }
}

impl From<Option<Vec<f32>>> for CachedField {
    fn from(vector: Option<Vec<f32>>) -> Self {
        vector.map_or(Self::Empty, |v| Self::Embedding(Arc::from(v)))
    }
}

impl From<Option<ClassMembership>> for CachedField {
    fn from(classes: Option<ClassMembership>) -> Self {
        classes.map_or(Self::Empty, |c| Self::Classes(Arc::new(c)))
    }
}
