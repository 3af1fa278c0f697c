use super::error_code::{self, KgSimErrorCode};

/// Vector index errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IndexError {
    #[error("entity {entity} is not in the vector index")]
    UnknownEntity { entity: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index build failed: {reason}")]
    BuildFailed { reason: String },

    #[error("index search failed: {reason}")]
    SearchFailed { reason: String },
}

pub type IndexResult<T> = Result<T, IndexError>;

impl KgSimErrorCode for IndexError {
    fn error_code(&self) -> &'static str {
        error_code::INDEX_ERROR
    }
}
