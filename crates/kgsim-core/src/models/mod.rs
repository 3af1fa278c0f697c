pub mod class_membership;
pub mod embedding_kind;
pub mod entity;
pub mod entity_record;
pub mod measure_family;

pub use class_membership::{ClassCount, ClassMembership};
pub use embedding_kind::EmbeddingKind;
pub use entity::{EntityId, ScoredEntity};
pub use entity_record::EntityRecord;
pub use measure_family::MeasureFamily;
