use tracing::{debug, trace};

use crate::job::Job;
use crate::types::Weight;

use super::WorkerPool;

impl WorkerPool {
    /// Queue a closure with the given SJF weight.
    pub fn add_job<F>(&self, weight: Weight, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Job::new(weight, task));
    }

    /// Queue a prepared [`Job`]. Wakes exactly one parked worker.
    pub fn submit(&self, job: Job) {
        let mut state = self.shared.lock();
        debug!(
            job = job.label(),
            weight = job.weight(),
            queued = state.queue.len() + 1,
            "job queued"
        );
        state.queue.push(job);
        state.metrics.record_submission();
        self.shared.job_available.notify_one();
    }

    /// Block until the queue is empty and no worker is executing.
    ///
    /// Both conditions are required: a dequeued job may still be running.
    /// Must not be called from inside a job, which would wait on itself.
    pub fn wait_for_drain(&self) {
        let mut state = self.shared.lock();
        while !state.is_quiescent() {
            trace!(pending = state.queue.len(), active = state.active, "waiting for drain");
            state = self.shared.wait(&self.shared.drained, state);
        }
    }
}
