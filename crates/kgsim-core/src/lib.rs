//! # kgsim-core
//!
//! Foundation crate for the kgsim similarity engine.
//! Defines the entity/record model, the backend and measure traits, errors,
//! config, constants, and the ontology helpers shared by every other crate.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod ontology;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::KgSimConfig;
pub use errors::{KgSimError, KgSimResult};
pub use models::{ClassMembership, EmbeddingKind, EntityId, EntityRecord, ScoredEntity};
