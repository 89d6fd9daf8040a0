#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::{Arc, Barrier, Mutex};
    use std::thread;
    use std::time::Duration;

    use crate::job::Job;
    use crate::runner::WorkerPool;
    use crate::types::PoolConfig;

    fn pool(threads: usize) -> WorkerPool {
        WorkerPool::new(PoolConfig::with_threads(threads)).unwrap()
    }

    /// Occupies the pool's only worker until the returned sender fires, so
    /// later submissions all sit in the queue together.
    fn block_single_worker(pool: &WorkerPool) -> mpsc::Sender<()> {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel::<()>();
        pool.add_job(0, move || {
            started_tx.send(()).unwrap();
            release_rx.recv().ok();
        });
        started_rx.recv().unwrap();
        release_tx
    }

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn FnOnce() + Send>) {
        let order = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&order);
        let make = move |name: &str| -> Box<dyn FnOnce() + Send> {
            let log = Arc::clone(&log);
            let name = name.to_string();
            Box::new(move || log.lock().unwrap().push(name))
        };
        (order, make)
    }

    #[test]
    fn pool_creation() {
        let pool = pool(3);
        assert_eq!(pool.worker_count(), 3);
        assert_eq!(pool.pending(), 0);
        assert_eq!(pool.active(), 0);
    }

    #[test]
    fn sjf_start_order_on_single_worker() {
        let pool = pool(1);
        let (order, make) = recorder();
        let release = block_single_worker(&pool);

        for weight in [5u64, 1, 3] {
            let job = make(&weight.to_string());
            pool.add_job(weight, job);
        }
        assert_eq!(pool.pending(), 3);

        release.send(()).unwrap();
        pool.wait_for_drain();

        assert_eq!(*order.lock().unwrap(), ["1", "3", "5"]);
    }

    #[test]
    fn equal_weights_start_in_submission_order() {
        let pool = pool(1);
        let (order, make) = recorder();
        let release = block_single_worker(&pool);

        pool.add_job(7, make("x"));
        pool.add_job(7, make("y"));
        pool.add_job(3, make("first"));
        pool.add_job(7, make("z"));

        release.send(()).unwrap();
        pool.wait_for_drain();

        assert_eq!(*order.lock().unwrap(), ["first", "x", "y", "z"]);
    }

    #[test]
    fn drain_before_any_submission_returns_immediately() {
        let pool = pool(2);
        pool.wait_for_drain();
        assert_eq!(pool.metrics().jobs_submitted, 0);
    }

    #[test]
    fn drain_waits_for_every_job() {
        let pool = pool(4);
        let done = Arc::new(AtomicUsize::new(0));

        for i in 0..16u64 {
            let done = Arc::clone(&done);
            pool.add_job(i % 3, move || {
                thread::sleep(Duration::from_millis(5));
                done.fetch_add(1, Ordering::SeqCst);
            });
        }

        pool.wait_for_drain();
        assert_eq!(done.load(Ordering::SeqCst), 16);
        assert_eq!(pool.pending(), 0);
        assert_eq!(pool.active(), 0);
    }

    #[test]
    fn drain_blocks_while_job_active_with_empty_queue() {
        let pool = pool(2);
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel::<()>();
        pool.add_job(1, move || {
            started_tx.send(()).unwrap();
            release_rx.recv().ok();
        });
        started_rx.recv().unwrap();

        let drained = AtomicBool::new(false);
        let (pending, active, released_early) = thread::scope(|s| {
            s.spawn(|| {
                pool.wait_for_drain();
                drained.store(true, Ordering::SeqCst);
            });

            thread::sleep(Duration::from_millis(50));
            let observed = (pool.pending(), pool.active(), drained.load(Ordering::SeqCst));
            release_tx.send(()).unwrap();
            observed
        });

        assert_eq!(pending, 0, "queue should already be empty");
        assert_eq!(active, 1);
        assert!(!released_early, "barrier released while a job was running");
        assert!(drained.load(Ordering::SeqCst));
    }

    #[test]
    fn workers_run_jobs_concurrently() {
        let pool = pool(4);
        let rendezvous = Arc::new(Barrier::new(4));
        let passed = Arc::new(AtomicUsize::new(0));

        for _ in 0..4 {
            let rendezvous = Arc::clone(&rendezvous);
            let passed = Arc::clone(&passed);
            pool.add_job(1, move || {
                rendezvous.wait();
                passed.fetch_add(1, Ordering::SeqCst);
            });
        }

        pool.wait_for_drain();
        assert_eq!(passed.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn panicking_job_does_not_hang_barrier() {
        let pool = pool(1);
        let ran_after = Arc::new(AtomicBool::new(false));

        pool.add_job(1, || panic!("boom"));
        let flag = Arc::clone(&ran_after);
        pool.add_job(2, move || flag.store(true, Ordering::SeqCst));

        pool.wait_for_drain();
        assert!(ran_after.load(Ordering::SeqCst), "worker should survive a panicking job");

        let metrics = pool.metrics();
        assert_eq!(metrics.jobs_executed, 2);
        assert_eq!(metrics.jobs_panicked, 1);
    }

    #[test]
    fn shutdown_discards_queued_jobs() {
        let pool = pool(1);
        let ran = Arc::new(AtomicUsize::new(0));
        let release = block_single_worker(&pool);

        for w in 1..=3u64 {
            let ran = Arc::clone(&ran);
            pool.add_job(w, move || {
                ran.fetch_add(1, Ordering::SeqCst);
            });
        }

        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            release.send(()).ok();
        });

        let metrics = pool.shutdown();
        releaser.join().unwrap();

        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(metrics.jobs_discarded, 3);
        assert_eq!(metrics.jobs_executed, 1);
    }

    #[test]
    fn shutdown_releases_arguments_of_discarded_jobs() {
        let pool = pool(1);
        let release = block_single_worker(&pool);
        let arg = Arc::new(String::from("payload"));

        for w in 1..=2u64 {
            let captured = Arc::clone(&arg);
            pool.add_job(w, move || drop(captured));
        }
        assert_eq!(Arc::strong_count(&arg), 3);

        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            release.send(()).ok();
        });
        let metrics = pool.shutdown();
        releaser.join().unwrap();

        assert_eq!(metrics.jobs_discarded, 2);
        assert_eq!(Arc::strong_count(&arg), 1);
    }

    #[test]
    fn take_metrics_resets_counters() {
        let pool = pool(2);
        for w in 0..5 {
            pool.add_job(w, || {});
        }
        pool.wait_for_drain();

        let first = pool.take_metrics();
        assert_eq!(first.jobs_submitted, 5);
        assert_eq!(first.jobs_executed, 5);

        pool.submit(Job::new(1, || {}).with_label("second-phase"));
        pool.wait_for_drain();
        let second = pool.take_metrics();
        assert_eq!(second.jobs_submitted, 1);
        assert_eq!(second.jobs_executed, 1);
    }

    #[test]
    fn worker_threads_are_named() {
        let config = PoolConfig {
            worker_threads: 1,
            thread_name_prefix: "sjf".into(),
        };
        let pool = WorkerPool::new(config).unwrap();
        let seen = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&seen);
        pool.add_job(0, move || {
            *slot.lock().unwrap() = thread::current().name().map(str::to_string);
        });
        pool.wait_for_drain();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("sjf-0"));
    }

    #[test]
    fn drop_without_shutdown_joins_workers() {
        let done = Arc::new(AtomicBool::new(false));
        {
            let pool = pool(2);
            let flag = Arc::clone(&done);
            pool.add_job(0, move || flag.store(true, Ordering::SeqCst));
            pool.wait_for_drain();
        }
        assert!(done.load(Ordering::SeqCst));
    }

    #[test]
    fn invalid_config_is_rejected_before_spawning() {
        let config = PoolConfig {
            worker_threads: 2,
            thread_name_prefix: "nul\0".into(),
        };
        assert!(WorkerPool::new(config).is_err());
    }
}
