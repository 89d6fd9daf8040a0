use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Ordered key -> values multimap. Values keep arrival order per key.
pub(crate) type Entries = BTreeMap<String, Vec<String>>;

#[derive(Debug, Default)]
pub(crate) struct PartitionData {
    pub(crate) entries: Entries,
    pub(crate) pairs: u64,
}

/// One writable partition. Each has its own lock so emits to different
/// partitions never contend.
#[derive(Debug, Default)]
pub(crate) struct Partition {
    data: Mutex<PartitionData>,
}

impl Partition {
    /// A panic between two emits cannot leave the map half-updated, so a
    /// poisoned guard is still usable.
    fn lock(&self) -> MutexGuard<'_, PartitionData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn insert(&self, key: String, value: String) {
        let mut data = self.lock();
        data.entries.entry(key).or_default().push(value);
        data.pairs += 1;
    }

    pub(crate) fn pair_count(&self) -> u64 {
        self.lock().pairs
    }

    pub(crate) fn into_data(self) -> PartitionData {
        self.data.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
