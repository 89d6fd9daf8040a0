//! Worker pool runner -- owns the worker threads and the shared queue.
//!
//! Split into focused submodules:
//! - `core`: WorkerPool struct, construction with rollback, shutdown
//! - `execution`: the worker thread loop
//! - `scheduling`: job submission and the drain barrier

mod core;
mod execution;
mod scheduling;
#[cfg(test)]
mod tests;

pub use self::core::WorkerPool;
