//! Configuration for parallel training.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default bound on how long `build` waits for its shards.
pub const DEFAULT_TRAINING_TIMEOUT: Duration = Duration::from_secs(255 * 60);

/// Configuration for building a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training workers.
    /// If None, uses the number of CPU cores.
    pub num_threads: Option<usize>,

    /// Upper bound on the time to wait for every shard to finish.
    pub timeout: Duration,

    /// Whether estimators start with a Laplace prior of 1.
    pub laplace: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            timeout: DEFAULT_TRAINING_TIMEOUT,
            laplace: true,
        }
    }
}

impl TrainingConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Set the number of workers.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Set the training timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable Laplace smoothing.
    pub fn with_laplace(mut self, laplace: bool) -> Self {
        self.laplace = laplace;
        self
    }

    /// Effective worker count.
    pub fn worker_count(&self) -> usize {
        self.num_threads.unwrap_or_else(num_cpus::get).max(1)
    }
}
