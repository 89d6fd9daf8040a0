//! Fixed-size worker pool with shortest-job-first scheduling.
//!
//! Jobs are submitted with a scalar weight and dequeued smallest-first, ties
//! broken by submission order. [`WorkerPool::wait_for_drain`] is a barrier:
//! it returns only once the queue is empty *and* no worker is executing.

pub mod error;
pub mod job;
pub mod metrics;
pub mod queue;
pub mod runner;
pub mod types;

pub use error::PoolError;
pub use job::Job;
pub use metrics::PoolMetrics;
pub use queue::JobQueue;
pub use runner::WorkerPool;
pub use types::{PoolConfig, Weight};
