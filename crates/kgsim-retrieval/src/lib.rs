//! # kgsim-retrieval
//!
//! Everything that ranks rather than scores: vector index adapters (exact and
//! HNSW), TopSim candidate generation and memoized top-similarity regions, the
//! two region measures built on them, the name → measure registry, and the
//! `SimilarityEngine` facade the request layer talks to.

pub mod candidates;
pub mod engine;
pub mod index;
pub mod region_measures;
pub mod regions;
pub mod registry;

pub use candidates::CandidateGenerator;
pub use engine::{
    IndexStrategy, LabeledNeighbor, PairOutcome, ScoreRow, ScoreTable, SimilarityEngine,
    SimilarityEngineBuilder, TopKOutcome,
};
pub use index::{ExactIndex, HnswIndex};
pub use region_measures::{RegionBlendMeasure, RegionGatedMeasure};
pub use regions::TopSimRegions;
pub use registry::{MeasureKind, MeasureRegistry};
