use std::borrow::Cow;
use std::fmt;

use crate::types::Weight;

/// A unit of work the pool can execute.
///
/// The closure owns whatever arguments it captured, so a job that is dropped
/// without running (e.g. discarded at shutdown) releases them too.
pub struct Job {
    weight: Weight,
    label: Cow<'static, str>,
    task: Box<dyn FnOnce() + Send + 'static>,
}

impl Job {
    pub fn new<F>(weight: Weight, task: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            weight,
            label: Cow::Borrowed("job"),
            task: Box::new(task),
        }
    }

    /// Attach a human-readable label used in logs.
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Consume the job and execute it on the current thread.
    pub fn run(self) {
        (self.task)()
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("weight", &self.weight)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
