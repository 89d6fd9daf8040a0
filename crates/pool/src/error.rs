use thiserror::Error;

/// Errors surfaced while building or driving a [`WorkerPool`](crate::WorkerPool).
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pool config: {0}")]
    InvalidConfig(String),
}
