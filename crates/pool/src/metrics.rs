use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Pool execution counters, updated by workers under the pool lock.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PoolMetrics {
    /// Jobs accepted by `add_job`.
    pub jobs_submitted: u64,
    /// Jobs that ran to completion or panicked.
    pub jobs_executed: u64,
    /// Jobs whose closure panicked (counted in `jobs_executed` too).
    pub jobs_panicked: u64,
    /// Jobs still queued when the pool shut down.
    pub jobs_discarded: u64,
    /// Sum of job execution times across all workers.
    pub busy_time: Duration,
    /// Longest single job.
    pub max_job_duration: Duration,
    /// Mean job duration.
    pub avg_job_duration: Duration,
    /// When the most recent job finished.
    pub last_completed: Option<DateTime<Utc>>,
}

impl PoolMetrics {
    pub fn record_submission(&mut self) {
        self.jobs_submitted += 1;
    }

    /// Record a finished job.
    pub fn record_execution(&mut self, duration: Duration, panicked: bool) {
        self.jobs_executed += 1;
        if panicked {
            self.jobs_panicked += 1;
        }
        self.busy_time += duration;
        self.max_job_duration = self.max_job_duration.max(duration);
        self.last_completed = Some(Utc::now());

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let count = self.jobs_executed;
        self.avg_job_duration = if count == 1 {
            duration
        } else {
            let prev_nanos = self.avg_job_duration.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };
    }

    pub fn record_discarded(&mut self, count: usize) {
        self.jobs_discarded += count as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_single_execution() {
        let mut m = PoolMetrics::default();
        m.record_submission();
        m.record_execution(Duration::from_millis(100), false);

        assert_eq!(m.jobs_submitted, 1);
        assert_eq!(m.jobs_executed, 1);
        assert_eq!(m.jobs_panicked, 0);
        assert!(m.last_completed.is_some());
        assert_eq!(m.avg_job_duration, Duration::from_millis(100));
        assert_eq!(m.max_job_duration, Duration::from_millis(100));
    }

    #[test]
    fn record_multiple_executions_averages() {
        let mut m = PoolMetrics::default();
        m.record_execution(Duration::from_millis(100), false);
        m.record_execution(Duration::from_millis(200), true);

        assert_eq!(m.jobs_executed, 2);
        assert_eq!(m.jobs_panicked, 1);
        assert_eq!(m.busy_time, Duration::from_millis(300));
        assert_eq!(m.max_job_duration, Duration::from_millis(200));
        // Average of 100ms and 200ms = 150ms
        let avg = m.avg_job_duration.as_millis();
        assert!((140..=160).contains(&avg), "expected ~150ms, got {}ms", avg);
    }

    #[test]
    fn default_metrics() {
        let m = PoolMetrics::default();
        assert_eq!(m.jobs_executed, 0);
        assert_eq!(m.jobs_discarded, 0);
        assert_eq!(m.busy_time, Duration::ZERO);
        assert!(m.last_completed.is_none());
    }
}
