//! Preloaded read-only tier.
//!
//! Holds a fixed set of entity records loaded at startup from a JSON dump
//! (an array of `EntityRecord`). Lookups never miss into the backend for the
//! fields a record covers.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use kgsim_core::errors::ConfigError;
use kgsim_core::{EntityId, EntityRecord};

use crate::keys::{CachedField, FieldScope, NodeKey};

#[derive(Debug, Default)]
pub struct PreloadedTier {
    records: HashMap<EntityId, EntityRecord>,
}

impl PreloadedTier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = EntityRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.entity.clone(), r)).collect(),
        }
    }

    /// Load a JSON dump of entity records.
    pub fn load_json(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let records: Vec<EntityRecord> =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::from_records(records))
    }

    /// A record is authoritative for the per-entity fields it carries:
    /// an absent label, embedding or membership is the empty sentinel.
    /// Class counts and ontology edges are not part of a record.
    pub fn get(&self, key: &NodeKey) -> Option<CachedField> {
        let record = self.records.get(&key.entity)?;
        match key.scope {
            FieldScope::Label => Some(record.label.clone().into()),
            FieldScope::Embedding(kind) => Some(
                record
                    .embedding(kind)
                    .map_or(CachedField::Empty, |v| CachedField::Embedding(Arc::from(v))),
            ),
            FieldScope::ClassMembership => Some(record.classes.clone().into()),
            FieldScope::ClassCount | FieldScope::Ancestors | FieldScope::Descendants => None,
        }
    }

    pub fn record(&self, entity: &str) -> Option<&EntityRecord> {
        self.records.get(entity)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
