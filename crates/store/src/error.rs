use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("a store needs at least one partition")]
    NoPartitions,

    #[error("partition {index} out of range (store has {count})")]
    PartitionOutOfRange { index: usize, count: usize },
}
