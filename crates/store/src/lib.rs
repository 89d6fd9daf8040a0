//! Partitioned intermediate store for map output.
//!
//! Map tasks write through [`PartitionedStore`], which hashes each key to one
//! of P partitions and appends the value under that partition's own lock.
//! At the map/reduce barrier the store is consumed by
//! [`PartitionedStore::freeze`]; the resulting [`FrozenStore`] is read-only
//! and hands out a [`PartitionCursor`] per reduce task.

pub mod error;
pub mod frozen;
pub mod hash;
mod partition;
pub mod store;

pub use error::StoreError;
pub use frozen::{FrozenPartition, FrozenStore, PartitionCursor, PartitionStats};
pub use hash::{djb2, partition_of};
pub use store::{Emitter, PartitionedStore};
