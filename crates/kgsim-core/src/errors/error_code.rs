//! KgSimErrorCode trait for structured error codes at the service boundary.

/// Every error enum implements this to provide a stable code string that an
/// outer request layer can put into its error payload.
pub trait KgSimErrorCode {
    /// Returns the error code string (e.g., "UNKNOWN_MEASURE").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const BACKEND_UNAVAILABLE: &str = "BACKEND_UNAVAILABLE";
pub const BACKEND_QUERY_FAILED: &str = "BACKEND_QUERY_FAILED";
pub const BACKEND_WORKER_GONE: &str = "BACKEND_WORKER_GONE";
pub const MISSING_ENTITY: &str = "MISSING_ENTITY";
pub const INCOMPARABLE_DATA: &str = "INCOMPARABLE_DATA";
pub const UNKNOWN_MEASURE: &str = "UNKNOWN_MEASURE";
pub const INDEX_ERROR: &str = "INDEX_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
