use serde::{Deserialize, Serialize};

use super::defaults;

/// Knowledge graph backend access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Worker threads, each owning one backend connection. 1 = fully serialized.
    pub workers: usize,
    /// Bound of the shared job queue.
    pub queue_capacity: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            workers: defaults::DEFAULT_BACKEND_WORKERS,
            queue_capacity: defaults::DEFAULT_BACKEND_QUEUE_CAPACITY,
        }
    }
}
