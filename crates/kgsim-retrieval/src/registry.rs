//! Name → measure registry, assembled once at startup.
//!
//! Built-in measures are a closed set ([`MeasureKind`]). Composites resolve
//! their children by name from measures registered before them, so the
//! TopSim scorer can be any base or composite measure but never a region
//! measure.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use kgsim_cache::NodeStore;
use kgsim_core::config::KgSimConfig;
use kgsim_core::errors::{MeasureError, MeasureResult};
use kgsim_core::traits::IVectorIndex;
use kgsim_core::EmbeddingKind;
use kgsim_measures::{
    ClassIdfMeasure, EmbeddingMeasure, JiangConrathMeasure, MeanCombination, MeasureRef,
    OntologyReduction, WeightedSplit,
};
use kgsim_observability::events;

use crate::candidates::CandidateGenerator;
use crate::region_measures::{RegionBlendMeasure, RegionGatedMeasure};
use crate::regions::TopSimRegions;

/// Every built-in measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureKind {
    Complex,
    Transe,
    Text,
    Node2vec,
    Class,
    Jc,
    ComboMean,
    ComboWeightedMax,
    ComboWeightedMean,
    TopSimGated,
    TopSimBlend,
}

impl MeasureKind {
    /// Registration order. Children come before the composites using them.
    pub const ALL: [MeasureKind; 11] = [
        MeasureKind::Complex,
        MeasureKind::Transe,
        MeasureKind::Text,
        MeasureKind::Node2vec,
        MeasureKind::Class,
        MeasureKind::Jc,
        MeasureKind::ComboMean,
        MeasureKind::ComboWeightedMax,
        MeasureKind::ComboWeightedMean,
        MeasureKind::TopSimGated,
        MeasureKind::TopSimBlend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complex => "complex",
            Self::Transe => "transe",
            Self::Text => "text",
            Self::Node2vec => "node2vec",
            Self::Class => "class",
            Self::Jc => "jc",
            Self::ComboMean => "combo-mean",
            Self::ComboWeightedMax => "combo-weighted-max",
            Self::ComboWeightedMean => "combo-weighted-mean",
            Self::TopSimGated => "topsim-gated",
            Self::TopSimBlend => "topsim-blend",
        }
    }

    pub fn embedding_kind(&self) -> Option<EmbeddingKind> {
        match self {
            Self::Complex => Some(EmbeddingKind::Complex),
            Self::Transe => Some(EmbeddingKind::Transe),
            Self::Text => Some(EmbeddingKind::Text),
            Self::Node2vec => Some(EmbeddingKind::Node2vec),
            _ => None,
        }
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasureKind {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == name)
            .ok_or(MeasureError::UnknownMeasure { name })
    }
}

/// Lookup key shared by registration and resolution.
fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[derive(Default)]
struct Table {
    measures: HashMap<String, MeasureRef>,
    order: Vec<String>,
}

impl Table {
    fn add(&mut self, measure: MeasureRef) {
        let name = normalize(measure.name());
        if self.measures.insert(name.clone(), measure).is_none() {
            self.order.push(name);
        }
    }

    fn get(&self, name: &str) -> MeasureResult<MeasureRef> {
        self.measures
            .get(&normalize(name))
            .cloned()
            .ok_or_else(|| MeasureError::UnknownMeasure {
                name: name.to_string(),
            })
    }

    fn resolve(&self, names: &[String]) -> MeasureResult<Vec<MeasureRef>> {
        names.iter().map(|name| self.get(name)).collect()
    }
}

pub struct MeasureRegistry {
    table: Table,
    jc: Arc<JiangConrathMeasure>,
    regions: Arc<TopSimRegions>,
}

impl MeasureRegistry {
    /// Register every [`MeasureKind`] over `store`. Embedding measures get
    /// the index of their kind when one is given.
    ///
    /// Fails with `UnknownMeasure` when a composite member or the TopSim
    /// scorer names a measure that is not registered before it.
    pub fn build(
        store: Arc<NodeStore>,
        indexes: &HashMap<EmbeddingKind, Arc<dyn IVectorIndex>>,
        config: &KgSimConfig,
    ) -> MeasureResult<Self> {
        let mut table = Table::default();

        let mut embeddings: HashMap<EmbeddingKind, MeasureRef> = HashMap::new();
        for kind in EmbeddingKind::ALL {
            let mut measure = EmbeddingMeasure::new(kind, Arc::clone(&store))
                .with_retrieval(config.retrieval.clone());
            if let Some(index) = indexes.get(&kind) {
                measure = measure.with_index(Arc::clone(index));
            }
            let measure: MeasureRef = Arc::new(measure);
            embeddings.insert(kind, Arc::clone(&measure));
            table.add(measure);
        }

        table.add(Arc::new(ClassIdfMeasure::new(
            Arc::clone(&store),
            config.ontology.clone(),
        )));
        let jc = Arc::new(
            JiangConrathMeasure::new(Arc::clone(&store), config.ontology.clone())
                .with_aggregation(config.ontology.subsumer_aggregation),
        );
        table.add(Arc::clone(&jc) as MeasureRef);

        let composite = &config.composite;
        let mean = MeanCombination::new(
            MeasureKind::ComboMean.as_str(),
            table.resolve(&composite.mean_members)?,
        );
        table.add(Arc::new(mean));
        let embedding_members = table.resolve(&composite.embedding_members)?;
        let ontology_members = table.resolve(&composite.ontology_members)?;
        table.add(Arc::new(WeightedSplit::new(
            MeasureKind::ComboWeightedMax.as_str(),
            embedding_members.clone(),
            ontology_members.clone(),
            composite.max_split,
            OntologyReduction::Max,
        )));
        table.add(Arc::new(WeightedSplit::new(
            MeasureKind::ComboWeightedMean.as_str(),
            embedding_members,
            ontology_members,
            composite.mean_split,
            OntologyReduction::Mean,
        )));

        let scorer = table.get(&config.topsim.measure)?;
        let mut generator = CandidateGenerator::new(Arc::clone(&store));
        for kind in &config.topsim.embedding_families {
            if let Some(measure) = embeddings.get(kind) {
                generator = generator.with_retriever(*kind, Arc::clone(measure));
            }
        }
        let regions = Arc::new(TopSimRegions::new(
            generator,
            scorer,
            config.topsim.clone(),
            config.cache.region_capacity,
        ));
        table.add(Arc::new(RegionGatedMeasure::new(
            MeasureKind::TopSimGated.as_str(),
            Arc::clone(&regions),
        )));
        table.add(Arc::new(RegionBlendMeasure::new(
            MeasureKind::TopSimBlend.as_str(),
            Arc::clone(&regions),
        )));

        events::registry_ready(&table.order);
        Ok(Self { table, jc, regions })
    }

    /// Add or replace a measure under its own name.
    pub fn register(&mut self, measure: MeasureRef) {
        self.table.add(measure);
    }

    pub fn get(&self, name: &str) -> MeasureResult<MeasureRef> {
        self.table.get(name)
    }

    pub fn get_kind(&self, kind: MeasureKind) -> MeasureResult<MeasureRef> {
        self.get(kind.as_str())
    }

    /// Registered names in registration order.
    pub fn names(&self) -> &[String] {
        &self.table.order
    }

    pub fn jiang_conrath(&self) -> &Arc<JiangConrathMeasure> {
        &self.jc
    }

    pub fn regions(&self) -> &Arc<TopSimRegions> {
        &self.regions
    }
}
