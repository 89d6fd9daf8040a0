use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use shardmr_core::EngineConfig;
use shardmr_pool::{Job, PoolConfig, WorkerPool};
use shardmr_store::{FrozenStore, PartitionedStore};
use tracing::{debug, error, info, info_span, Span};
use uuid::Uuid;

use crate::error::EngineError;
use crate::probe::{FileSizeProbe, SizeProbe};
use crate::report::{Phase, PhaseReport, RunReport};
use crate::task::{Mapper, ReduceContext, Reducer};

/// Single-machine map/reduce driver.
///
/// Holds only configuration. Each [`run`](Self::run) creates its own pool and
/// store and destroys both before returning, so nothing carries over between
/// runs.
#[derive(Debug, Clone)]
pub struct MapReduce {
    config: EngineConfig,
}

impl MapReduce {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run both phases to completion.
    ///
    /// Map jobs are weighted by `probe`; reduce jobs by their partition's
    /// pair count. Blocks until every job has finished and the pool is
    /// joined. A panic inside a map job skips the reduce phase; either way
    /// the pool is torn down before [`EngineError::JobsPanicked`] is
    /// returned.
    pub fn run<I, P, M, R>(
        &self,
        inputs: Vec<I>,
        probe: &P,
        mapper: M,
        reducer: R,
    ) -> Result<RunReport, EngineError>
    where
        I: Send + 'static,
        P: SizeProbe<I> + ?Sized,
        M: Mapper<I> + 'static,
        R: Reducer + 'static,
    {
        let run_id = Uuid::new_v4();
        let span = info_span!("mapreduce", %run_id);
        let _entered = span.enter();

        let started_at = Utc::now();
        let input_count = inputs.len();
        let pool = WorkerPool::new(self.pool_config())?;
        let store = Arc::new(PartitionedStore::new(self.config.partitions)?);
        let workers = pool.worker_count();
        info!(
            inputs = input_count,
            workers,
            partitions = store.partition_count(),
            "run started"
        );

        let map = map_phase(&pool, &store, inputs, probe, Arc::new(mapper));
        if map.panicked > 0 {
            pool.shutdown();
            error!(panicked = map.panicked, "map phase had panics, skipping reduce");
            return Err(EngineError::JobsPanicked {
                phase: Phase::Map,
                count: map.panicked,
            });
        }

        // Every map closure has been dropped once the barrier released.
        let store = Arc::try_unwrap(store).map_err(|_| EngineError::StoreStillShared)?;
        let frozen = Arc::new(store.freeze());
        let partitions = frozen.stats();

        let reduce = reduce_phase(&pool, &frozen, Arc::new(reducer));
        let leftover = pool.shutdown();
        debug!(discarded = leftover.jobs_discarded, "pool torn down");
        drop(frozen);

        if reduce.panicked > 0 {
            error!(panicked = reduce.panicked, "reduce phase had panics");
            return Err(EngineError::JobsPanicked {
                phase: Phase::Reduce,
                count: reduce.panicked,
            });
        }

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            workers,
            inputs: input_count,
            map,
            reduce,
            partitions,
        };
        info!(
            keys = report.total_keys(),
            pairs = report.total_pairs(),
            elapsed_ms = report.elapsed().as_millis() as u64,
            "run finished"
        );
        Ok(report)
    }

    /// [`run`](Self::run) over files, weighted by their byte length.
    pub fn run_files<P, M, R>(
        &self,
        paths: Vec<P>,
        mapper: M,
        reducer: R,
    ) -> Result<RunReport, EngineError>
    where
        P: AsRef<Path> + Send + 'static,
        M: Mapper<P> + 'static,
        R: Reducer + 'static,
    {
        self.run(paths, &FileSizeProbe, mapper, reducer)
    }

    fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            worker_threads: self.config.workers,
            thread_name_prefix: self.config.thread_name_prefix.clone(),
        }
    }
}

fn map_phase<I, P, M>(
    pool: &WorkerPool,
    store: &Arc<PartitionedStore>,
    inputs: Vec<I>,
    probe: &P,
    mapper: Arc<M>,
) -> PhaseReport
where
    I: Send + 'static,
    P: SizeProbe<I> + ?Sized,
    M: Mapper<I> + 'static,
{
    let started = Instant::now();

    // All inputs are probed before the first submit, then queued lightest first.
    let mut weighted: Vec<(u64, usize, I)> = inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| (probe_weight(probe, &input, index), index, input))
        .collect();
    weighted.sort_by_key(|(weight, index, _)| (*weight, *index));

    for (weight, index, input) in weighted {
        let store = Arc::clone(store);
        let mapper = Arc::clone(&mapper);
        let span = Span::current();

        let job = Job::new(weight, move || {
            let _entered = span.enter();
            let emit = store.emitter();
            mapper.map(&input, &emit);
            debug!(input = index, emitted = emit.emitted(), "map task finished");
        });
        pool.submit(job.with_label(format!("map-{index}")));
    }

    pool.wait_for_drain();
    let report = PhaseReport::from_metrics(Phase::Map, &pool.take_metrics(), started.elapsed());
    info!(
        jobs = report.jobs,
        panicked = report.panicked,
        wall_ms = report.wall_time.as_millis() as u64,
        "map phase complete"
    );
    report
}

fn reduce_phase<R>(pool: &WorkerPool, frozen: &Arc<FrozenStore>, reducer: Arc<R>) -> PhaseReport
where
    R: Reducer + 'static,
{
    let started = Instant::now();

    let mut order: Vec<(u64, usize)> = frozen
        .partitions()
        .iter()
        .map(|partition| (partition.pair_count(), partition.index()))
        .collect();
    order.sort_unstable();

    for (weight, index) in order {
        let store = Arc::clone(frozen);
        let reducer = Arc::clone(&reducer);
        let span = Span::current();

        let job = Job::new(weight, move || {
            let _entered = span.enter();
            reduce_partition(&store, index, &*reducer);
        });
        pool.submit(job.with_label(format!("reduce-{index}")));
    }

    pool.wait_for_drain();
    let report =
        PhaseReport::from_metrics(Phase::Reduce, &pool.take_metrics(), started.elapsed());
    info!(
        jobs = report.jobs,
        panicked = report.panicked,
        wall_ms = report.wall_time.as_millis() as u64,
        "reduce phase complete"
    );
    report
}

fn reduce_partition<R: Reducer + ?Sized>(store: &FrozenStore, index: usize, reducer: &R) {
    let partition = match store.partition(index) {
        Ok(partition) => partition,
        Err(err) => {
            error!(error = %err, "reduce scheduled for a missing partition");
            return;
        }
    };

    let mut ctx = ReduceContext::new(partition.cursor());
    for key in partition.keys() {
        ctx.start_key();
        reducer.reduce(key, &mut ctx);
    }
    debug!(
        partition = index,
        keys = partition.key_count(),
        pairs = partition.pair_count(),
        "reduce task finished"
    );
}

fn probe_weight<I, P>(probe: &P, input: &I, index: usize) -> u64
where
    P: SizeProbe<I> + ?Sized,
{
    match probe.probe(input) {
        Ok(weight) => weight,
        Err(err) => {
            debug!(input = index, error = %err, "size probe failed, scheduling with weight 0");
            0
        }
    }
}
