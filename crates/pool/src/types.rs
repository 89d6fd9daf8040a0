use serde::{Deserialize, Serialize};

use crate::error::PoolError;

/// Scheduling weight. Smaller runs first.
pub type Weight = u64;

/// Worker pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of worker threads. 0 = available parallelism.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    /// Worker threads are named `{prefix}-{index}`.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

fn default_worker_threads() -> usize { 0 }
fn default_thread_name_prefix() -> String { "pool-worker".into() }

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
            thread_name_prefix: default_thread_name_prefix(),
        }
    }
}

impl PoolConfig {
    /// Config with an explicit thread count and the default name prefix.
    pub fn with_threads(worker_threads: usize) -> Self {
        Self {
            worker_threads,
            ..Self::default()
        }
    }

    /// Resolve worker thread count (0 means use available parallelism).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.worker_threads
        }
    }

    pub(crate) fn thread_name(&self, index: usize) -> String {
        format!("{}-{}", self.thread_name_prefix, index)
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        // std::thread::Builder panics on interior NUL in a thread name.
        if self.thread_name_prefix.contains('\0') {
            return Err(PoolError::InvalidConfig(
                "thread_name_prefix must not contain NUL".into(),
            ));
        }
        Ok(())
    }
}
