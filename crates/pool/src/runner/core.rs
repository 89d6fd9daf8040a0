use std::mem;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{error, info, warn};

use crate::error::PoolError;
use crate::metrics::PoolMetrics;
use crate::queue::JobQueue;
use crate::types::PoolConfig;

use super::execution::worker_loop;

/// Everything guarded by the pool mutex. Queue, counters and the shutdown
/// flag change together, never independently.
#[derive(Default)]
pub(super) struct PoolState {
    pub(super) queue: JobQueue,
    /// Workers currently executing a job.
    pub(super) active: usize,
    pub(super) shutdown: bool,
    pub(super) metrics: PoolMetrics,
}

impl PoolState {
    /// Nothing queued and nothing running.
    pub(super) fn is_quiescent(&self) -> bool {
        self.queue.is_empty() && self.active == 0
    }
}

pub(super) struct Shared {
    state: Mutex<PoolState>,
    /// Workers park here while the queue is empty.
    pub(super) job_available: Condvar,
    /// Barrier callers park here until the pool is quiescent.
    pub(super) drained: Condvar,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: Mutex::new(PoolState::default()),
            job_available: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    /// Jobs never run under this lock, so a poisoned guard still holds a
    /// consistent state.
    pub(super) fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn wait<'a>(
        &self,
        cond: &Condvar,
        guard: MutexGuard<'a, PoolState>,
    ) -> MutexGuard<'a, PoolState> {
        cond.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_shutdown(&self) {
        let mut state = self.lock();
        state.shutdown = true;
        // Every parked worker has to see the flag, not just one.
        self.job_available.notify_all();
    }
}

/// A fixed set of OS threads consuming a shortest-job-first queue.
pub struct WorkerPool {
    pub(super) shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start the pool. If any worker fails to spawn, the threads already
    /// started are shut down and joined before the error is returned.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let num_workers = config.resolved_worker_threads();
        let shared = Arc::new(Shared::new());
        let mut workers = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(config.thread_name(index))
                .spawn(move || worker_loop(worker_shared, index));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(source) => {
                    error!(worker = index, error = %source, "failed to spawn worker, rolling back pool");
                    shared.begin_shutdown();
                    join_all(&mut workers);
                    return Err(PoolError::Spawn {
                        worker: index,
                        source,
                    });
                }
            }
        }

        info!(workers = num_workers, prefix = %config.thread_name_prefix, "worker pool started");
        Ok(Self { shared, workers })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Jobs queued but not yet picked up by a worker.
    pub fn pending(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// Workers currently executing a job.
    pub fn active(&self) -> usize {
        self.shared.lock().active
    }

    /// Get a snapshot of the current pool metrics.
    pub fn metrics(&self) -> PoolMetrics {
        self.shared.lock().metrics.clone()
    }

    /// Return the metrics gathered so far and start a fresh set.
    pub fn take_metrics(&self) -> PoolMetrics {
        mem::take(&mut self.shared.lock().metrics)
    }

    /// Stop the pool: wake every worker, join them all, then drop whatever
    /// is still queued. Returns the final metrics.
    pub fn shutdown(mut self) -> PoolMetrics {
        self.teardown()
    }

    fn teardown(&mut self) -> PoolMetrics {
        self.shared.begin_shutdown();
        join_all(&mut self.workers);

        let metrics = {
            // Workers are joined; nothing else takes this lock any more.
            let mut state = self.shared.lock();
            let discarded = state.queue.clear();
            if discarded > 0 {
                warn!(discarded, "dropped queued jobs at shutdown");
            }
            state.metrics.record_discarded(discarded);
            state.metrics.clone()
        };

        info!(executed = metrics.jobs_executed, "worker pool stopped");
        metrics
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.teardown();
        }
    }
}

fn join_all(workers: &mut Vec<JoinHandle<()>>) {
    for handle in workers.drain(..) {
        let name = handle.thread().name().unwrap_or("worker").to_string();
        if handle.join().is_err() {
            error!(worker = %name, "worker thread panicked");
        }
    }
}
