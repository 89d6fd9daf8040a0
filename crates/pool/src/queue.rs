//! Shortest-job-first queue.
//!
//! A binary min-heap keyed by `(weight, seq)`. `seq` is a monotonic arrival
//! counter, so jobs of equal weight come out in the order they went in.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::job::Job;
use crate::types::Weight;

struct Queued {
    seq: u64,
    job: Job,
}

impl Queued {
    fn key(&self) -> (Weight, u64) {
        (self.job.weight(), self.seq)
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    // Reversed: BinaryHeap is a max-heap, we want the smallest key on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

#[derive(Default)]
pub struct JobQueue {
    heap: BinaryHeap<Queued>,
    next_seq: u64,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: Job) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Queued { seq, job });
    }

    /// Remove the job with the smallest weight (earliest arrival among ties).
    pub fn pop(&mut self) -> Option<Job> {
        self.heap.pop().map(|q| q.job)
    }

    pub fn peek_weight(&self) -> Option<Weight> {
        self.heap.peek().map(|q| q.job.weight())
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every queued job, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.heap.len();
        self.heap.clear();
        discarded
    }
}
