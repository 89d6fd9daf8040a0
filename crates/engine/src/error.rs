use shardmr_core::ConfigError;
use shardmr_pool::PoolError;
use shardmr_store::StoreError;
use thiserror::Error;

use crate::report::Phase;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("worker pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("intermediate store still referenced after the map barrier")]
    StoreStillShared,

    #[error("{count} {phase} job(s) panicked")]
    JobsPanicked { phase: Phase, count: u64 },
}
