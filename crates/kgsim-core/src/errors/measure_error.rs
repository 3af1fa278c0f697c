use super::backend_error::BackendError;
use super::error_code::{self, KgSimErrorCode};
use super::index_error::IndexError;

/// Similarity measure errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeasureError {
    /// The entity has no data for the field the measure needs.
    #[error("entity {entity} is not present for {field}")]
    MissingEntity { entity: String, field: String },

    /// Both entities exist but the measure cannot compare them.
    #[error("cannot compare {a} and {b}: {reason}")]
    IncomparableData { a: String, b: String, reason: String },

    #[error("unknown similarity measure: {name}")]
    UnknownMeasure { name: String },

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("vector index error: {0}")]
    Index(#[from] IndexError),
}

pub type MeasureResult<T> = Result<T, MeasureError>;

impl MeasureError {
    pub fn incomparable(a: &str, b: &str, reason: impl Into<String>) -> Self {
        Self::IncomparableData {
            a: a.to_string(),
            b: b.to_string(),
            reason: reason.into(),
        }
    }
}

impl KgSimErrorCode for MeasureError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingEntity { .. } => error_code::MISSING_ENTITY,
            Self::IncomparableData { .. } => error_code::INCOMPARABLE_DATA,
            Self::UnknownMeasure { .. } => error_code::UNKNOWN_MEASURE,
            Self::Backend(e) => e.error_code(),
            Self::Index(e) => e.error_code(),
        }
    }
}
