/// Initial DJB2 state.
pub const DJB2_SEED: u64 = 5381;

/// DJB2 over the key's UTF-8 bytes: `hash * 33 + byte`, wrapping at 64 bits.
pub fn djb2(key: &str) -> u64 {
    key.bytes()
        .fold(DJB2_SEED, |hash, byte| {
            hash.wrapping_mul(33).wrapping_add(u64::from(byte))
        })
}

/// Partition index for `key` in a store with `partitions` partitions.
///
/// Deterministic for a given `(key, partitions)` pair, so every value emitted
/// under the same key lands in the same partition. Bytes hash as unsigned,
/// so a key with non-ASCII bytes can land in a different partition than a
/// signed-`char` C build would pick.
///
/// # Panics
///
/// Panics if `partitions` is zero. [`PartitionedStore`](crate::PartitionedStore)
/// rejects that at construction.
pub fn partition_of(key: &str, partitions: usize) -> usize {
    assert!(partitions > 0, "partition count must be non-zero");
    (djb2(key) % partitions as u64) as usize
}
