//! # kgsim-measures
//!
//! The base similarity measures and their combinators. Every measure reads
//! entity data through a shared [`kgsim_cache::NodeStore`] and returns scores
//! in `[0, 1]`.

pub mod class_idf;
pub mod composite;
pub mod cosine;
pub mod embedding;
pub mod jiang_conrath;

pub use class_idf::ClassIdfMeasure;
pub use composite::{MeanCombination, MeasureRef, OntologyReduction, WeightedSplit};
pub use embedding::EmbeddingMeasure;
pub use jiang_conrath::{JcExplanation, JiangConrathMeasure, SubsumerScore};
