//! Two-phase map/reduce orchestration over the SJF worker pool and the
//! partitioned store.
//!
//! A run builds a fresh pool and store, schedules one map job per input
//! (weighted by a [`SizeProbe`]), waits on the pool barrier, freezes the
//! store, then schedules one reduce job per partition weighted by its pair
//! count. Everything is torn down before [`MapReduce::run`] returns.

pub mod engine;
pub mod error;
pub mod probe;
pub mod report;
pub mod task;

pub use engine::MapReduce;
pub use error::EngineError;
pub use probe::{FileSizeProbe, FixedWeights, SizeProbe, Weighted};
pub use report::{Phase, PhaseReport, RunReport};
pub use task::{Mapper, ReduceContext, Reducer, Values};

pub use shardmr_core::EngineConfig;
pub use shardmr_store::{Emitter, PartitionStats};
