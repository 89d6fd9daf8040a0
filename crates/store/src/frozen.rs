use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::partition::Entries;

/// Size of one partition after the map phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionStats {
    pub index: usize,
    pub keys: usize,
    pub pairs: u64,
}

/// Read-only store produced by [`PartitionedStore::freeze`](crate::PartitionedStore::freeze).
///
/// Nothing can be emitted into it. It is `Sync`, so reduce tasks on
/// different threads read it through a shared reference.
#[derive(Debug)]
pub struct FrozenStore {
    partitions: Vec<FrozenPartition>,
}

impl FrozenStore {
    pub(crate) fn new(partitions: Vec<FrozenPartition>) -> Self {
        Self { partitions }
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn partition(&self, index: usize) -> Result<&FrozenPartition, StoreError> {
        self.partitions
            .get(index)
            .ok_or(StoreError::PartitionOutOfRange {
                index,
                count: self.partitions.len(),
            })
    }

    pub fn partitions(&self) -> &[FrozenPartition] {
        &self.partitions
    }

    /// Fresh cursor over partition `index`.
    pub fn cursor(&self, index: usize) -> Result<PartitionCursor<'_>, StoreError> {
        Ok(self.partition(index)?.cursor())
    }

    pub fn total_pairs(&self) -> u64 {
        self.partitions.iter().map(FrozenPartition::pair_count).sum()
    }

    pub fn stats(&self) -> Vec<PartitionStats> {
        self.partitions.iter().map(FrozenPartition::stats).collect()
    }
}

/// One partition's keys in ascending byte order, each with its values in
/// arrival order.
#[derive(Debug)]
pub struct FrozenPartition {
    index: usize,
    entries: Entries,
    pairs: u64,
}

impl FrozenPartition {
    pub(crate) fn new(index: usize, entries: Entries, pairs: u64) -> Self {
        Self {
            index,
            entries,
            pairs,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Distinct keys, ascending. Each appears exactly once.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn pair_count(&self) -> u64 {
        self.pairs
    }

    pub fn cursor(&self) -> PartitionCursor<'_> {
        PartitionCursor {
            partition: self,
            current: None,
        }
    }

    pub fn stats(&self) -> PartitionStats {
        PartitionStats {
            index: self.index,
            keys: self.key_count(),
            pairs: self.pairs,
        }
    }
}

#[derive(Debug)]
struct Tracked<'a> {
    key: &'a str,
    values: &'a [String],
    position: usize,
}

/// Stateful value iterator for one partition.
///
/// Remembers the key it is walking and how far it got. Asking for a
/// different key starts over at that key's first value. Owned by a single
/// reduce task and advanced through `&mut self`.
#[derive(Debug)]
pub struct PartitionCursor<'a> {
    partition: &'a FrozenPartition,
    current: Option<Tracked<'a>>,
}

impl<'a> PartitionCursor<'a> {
    pub fn partition(&self) -> usize {
        self.partition.index
    }

    /// Next unconsumed value for `key`, or `None` once its values are
    /// exhausted or if the key is absent from this partition.
    ///
    /// Values are returned as fresh strings owned by the caller.
    pub fn next_value(&mut self, key: &str) -> Option<String> {
        let switch = self.current.as_ref().map_or(true, |t| t.key != key);
        if switch {
            let partition: &'a FrozenPartition = self.partition;
            self.current = partition
                .entries
                .get_key_value(key)
                .map(|(stored, values)| Tracked {
                    key: stored.as_str(),
                    values: values.as_slice(),
                    position: 0,
                });
        }

        let tracked = self.current.as_mut()?;
        let value = tracked.values.get(tracked.position)?;
        tracked.position += 1;
        Some(value.clone())
    }

    /// Forget the tracked key. The next call starts from a first value.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
