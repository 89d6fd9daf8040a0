use std::cell::Cell;

use tracing::{debug, info};

use crate::error::StoreError;
use crate::frozen::{FrozenPartition, FrozenStore};
use crate::hash::partition_of;
use crate::partition::Partition;

/// Writable side of the store, shared by all map tasks.
#[derive(Debug)]
pub struct PartitionedStore {
    partitions: Vec<Partition>,
}

impl PartitionedStore {
    pub fn new(partitions: usize) -> Result<Self, StoreError> {
        if partitions == 0 {
            return Err(StoreError::NoPartitions);
        }
        let partitions = (0..partitions).map(|_| Partition::default()).collect();
        Ok(Self { partitions })
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Partition that `key` hashes to in this store.
    pub fn partition_for(&self, key: &str) -> usize {
        partition_of(key, self.partitions.len())
    }

    /// Record one `(key, value)` pair.
    ///
    /// Both strings are owned by the store from here on; callers may reuse
    /// or drop their buffers immediately. Safe to call from any number of
    /// threads at once. Values for a key are kept in the order their emits
    /// acquired the partition lock.
    pub fn emit(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let index = self.partition_for(&key);
        self.partitions[index].insert(key, value);
    }

    /// Handle passed to map callbacks.
    pub fn emitter(&self) -> Emitter<'_> {
        Emitter {
            store: self,
            emitted: Cell::new(0),
        }
    }

    /// Pairs stored per partition so far.
    pub fn pair_counts(&self) -> Vec<u64> {
        self.partitions.iter().map(Partition::pair_count).collect()
    }

    pub fn total_pairs(&self) -> u64 {
        self.pair_counts().iter().sum()
    }

    /// Close the store for writing. Taking `self` by value means no emitter
    /// can outlive this call.
    pub fn freeze(self) -> FrozenStore {
        let partitions: Vec<FrozenPartition> = self
            .partitions
            .into_iter()
            .enumerate()
            .map(|(index, partition)| {
                let data = partition.into_data();
                debug!(
                    partition = index,
                    keys = data.entries.len(),
                    pairs = data.pairs,
                    "partition frozen"
                );
                FrozenPartition::new(index, data.entries, data.pairs)
            })
            .collect();

        let store = FrozenStore::new(partitions);
        info!(
            partitions = store.partition_count(),
            pairs = store.total_pairs(),
            "store frozen for reduce"
        );
        store
    }
}

/// Borrowed emit handle for one map invocation.
///
/// Counts what it emitted so the caller can log per-task output volume.
#[derive(Debug)]
pub struct Emitter<'a> {
    store: &'a PartitionedStore,
    emitted: Cell<u64>,
}

impl Emitter<'_> {
    pub fn emit(&self, key: impl Into<String>, value: impl Into<String>) {
        self.store.emit(key, value);
        self.emitted.set(self.emitted.get() + 1);
    }

    /// Pairs emitted through this handle.
    pub fn emitted(&self) -> u64 {
        self.emitted.get()
    }

    pub fn partition_count(&self) -> usize {
        self.store.partition_count()
    }
}
