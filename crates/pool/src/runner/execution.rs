use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use super::core::Shared;

/// Body of every worker thread.
///
/// Parks on `job_available` while the queue is empty, takes the head job,
/// runs it with the pool lock released, then reports back and wakes barrier
/// waiters once the pool is quiescent. Exits as soon as it observes shutdown.
pub(super) fn worker_loop(shared: Arc<Shared>, worker_id: usize) {
    debug!(worker = worker_id, "worker started");

    loop {
        let job = {
            let mut state = shared.lock();
            while state.queue.is_empty() && !state.shutdown {
                state = shared.wait(&shared.job_available, state);
            }
            if state.shutdown {
                break;
            }
            let Some(job) = state.queue.pop() else {
                continue;
            };
            state.active += 1;
            job
        };

        let label = job.label().to_string();
        let weight = job.weight();
        debug!(worker = worker_id, job = %label, weight, "job started");

        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(move || job.run()));
        let elapsed = started.elapsed();

        if let Err(payload) = &outcome {
            error!(
                worker = worker_id,
                job = %label,
                panic = %panic_message(payload.as_ref()),
                "job panicked"
            );
        } else {
            debug!(worker = worker_id, job = %label, elapsed = ?elapsed, "job finished");
        }

        let mut state = shared.lock();
        state.active -= 1;
        state.metrics.record_execution(elapsed, outcome.is_err());
        if state.is_quiescent() {
            shared.drained.notify_all();
        }
    }

    debug!(worker = worker_id, "worker exiting");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
