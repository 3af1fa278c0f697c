use super::error_code::{self, KgSimErrorCode};

/// Knowledge graph / path backend errors.
///
/// These are never retried internally. They fail the call that hit them and,
/// in batch contexts, only the element that hit them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("backend query `{query}` failed: {reason}")]
    QueryFailed { query: String, reason: String },

    #[error("backend worker pool is gone: {reason}")]
    WorkerGone { reason: String },
}

pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    pub fn query_failed(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::QueryFailed {
            query: query.into(),
            reason: reason.into(),
        }
    }
}

impl KgSimErrorCode for BackendError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => error_code::BACKEND_UNAVAILABLE,
            Self::QueryFailed { .. } => error_code::BACKEND_QUERY_FAILED,
            Self::WorkerGone { .. } => error_code::BACKEND_WORKER_GONE,
        }
    }
}
