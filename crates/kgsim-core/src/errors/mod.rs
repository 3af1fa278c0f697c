//! Error handling for kgsim.
//! One error enum per subsystem, `thiserror` only, aggregated by `KgSimError`.

pub mod backend_error;
pub mod config_error;
pub mod error_code;
pub mod index_error;
pub mod kgsim_error;
pub mod measure_error;

pub use backend_error::{BackendError, BackendResult};
pub use config_error::ConfigError;
pub use error_code::KgSimErrorCode;
pub use index_error::{IndexError, IndexResult};
pub use kgsim_error::{KgSimError, KgSimResult};
pub use measure_error::{MeasureError, MeasureResult};
