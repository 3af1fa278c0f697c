//! # kgsim-observability
//!
//! Structured tracing for kgsim: subscriber setup driven by `KGSIM_LOG` or
//! the observability config, and the named log events emitted by the cache,
//! measure and retrieval layers.

pub mod tracing_setup;

pub use tracing_setup::{events, init_from_config, init_tracing, init_tracing_with_filter};
