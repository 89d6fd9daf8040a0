use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shardmr_pool::PoolMetrics;
use shardmr_store::PartitionStats;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Map,
    Reduce,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Map => write!(f, "map"),
            Phase::Reduce => write!(f, "reduce"),
        }
    }
}

/// What one phase cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub phase: Phase,
    /// Jobs executed (panicked ones included).
    pub jobs: u64,
    pub panicked: u64,
    /// Sum of job run times across all workers.
    pub busy_time: Duration,
    pub max_job_duration: Duration,
    /// Submission of the first job to the barrier releasing.
    pub wall_time: Duration,
}

impl PhaseReport {
    pub(crate) fn from_metrics(phase: Phase, metrics: &PoolMetrics, wall_time: Duration) -> Self {
        Self {
            phase,
            jobs: metrics.jobs_executed,
            panicked: metrics.jobs_panicked,
            busy_time: metrics.busy_time,
            max_job_duration: metrics.max_job_duration,
            wall_time,
        }
    }
}

/// Diagnostics for a finished run.
///
/// Results reach the caller through the reducer's own side effects; this is
/// only the bookkeeping around them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub workers: usize,
    pub inputs: usize,
    pub map: PhaseReport,
    pub reduce: PhaseReport,
    pub partitions: Vec<PartitionStats>,
}

impl RunReport {
    pub fn total_pairs(&self) -> u64 {
        self.partitions.iter().map(|p| p.pairs).sum()
    }

    pub fn total_keys(&self) -> usize {
        self.partitions.iter().map(|p| p.keys).sum()
    }

    pub fn elapsed(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}
