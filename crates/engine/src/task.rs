use shardmr_store::{Emitter, PartitionCursor};

/// User map callback. Called once per input on some pool worker.
///
/// Implementations emit any number of `(key, value)` pairs. Many map calls
/// run at once, so the mapper itself is shared across threads.
pub trait Mapper<I>: Send + Sync {
    fn map(&self, input: &I, emit: &Emitter<'_>);
}

impl<I, F> Mapper<I> for F
where
    F: Fn(&I, &Emitter<'_>) + Send + Sync,
{
    fn map(&self, input: &I, emit: &Emitter<'_>) {
        self(input, emit)
    }
}

/// User reduce callback. Called once per distinct key, in ascending key
/// order within each partition.
///
/// The callback pulls the key's values through [`ReduceContext::get_next`]
/// until it returns `None`.
pub trait Reducer: Send + Sync {
    fn reduce(&self, key: &str, ctx: &mut ReduceContext<'_>);
}

impl<F> Reducer for F
where
    F: Fn(&str, &mut ReduceContext<'_>) + Send + Sync,
{
    fn reduce(&self, key: &str, ctx: &mut ReduceContext<'_>) {
        self(key, ctx)
    }
}

/// Value access for one reduce invocation, bound to the partition that
/// invocation was scheduled for.
#[derive(Debug)]
pub struct ReduceContext<'a> {
    cursor: PartitionCursor<'a>,
}

impl<'a> ReduceContext<'a> {
    pub(crate) fn new(cursor: PartitionCursor<'a>) -> Self {
        Self { cursor }
    }

    /// Partition this invocation is reducing.
    pub fn partition(&self) -> usize {
        self.cursor.partition()
    }

    /// Next value for `key` in this partition, or `None` when exhausted.
    ///
    /// Asking for a different key than the previous call restarts at that
    /// key's first value.
    pub fn get_next(&mut self, key: &str) -> Option<String> {
        self.cursor.next_value(key)
    }

    /// Remaining values for `key` as an iterator.
    pub fn values<'c>(&'c mut self, key: &'c str) -> Values<'c, 'a> {
        Values { ctx: self, key }
    }

    pub(crate) fn start_key(&mut self) {
        self.cursor.reset();
    }
}

/// Iterator returned by [`ReduceContext::values`].
#[derive(Debug)]
pub struct Values<'c, 'a> {
    ctx: &'c mut ReduceContext<'a>,
    key: &'c str,
}

impl Iterator for Values<'_, '_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.ctx.get_next(self.key)
    }
}
