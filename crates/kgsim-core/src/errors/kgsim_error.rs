//! Top-level error aggregating every subsystem error via `From` conversions.

use super::{BackendError, ConfigError, IndexError, KgSimErrorCode, MeasureError};

#[derive(Debug, Clone, thiserror::Error)]
pub enum KgSimError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Measure error: {0}")]
    Measure(#[from] MeasureError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type KgSimResult<T> = Result<T, KgSimError>;

impl KgSimErrorCode for KgSimError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Backend(e) => e.error_code(),
            Self::Measure(e) => e.error_code(),
            Self::Index(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
