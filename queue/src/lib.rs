//! Concurrent FIFO queues for the benchmark harness.
//!
//! Five variants, same contract (FIFO, no loss, no duplication):
//! [`LockedQueue`] over a [`lock::TasLock`] or [`lock::ClhLock`],
//! [`MsQueue`] (Michael & Scott, lock-free), [`BatchQueue`] (amortised
//! over thread-local batches), [`BackoffBatchQueue`] (batch queue plus
//! exponential backoff on contended splices).

mod batch_core;
mod batch_queue;
mod backoff_queue;
pub mod lock;
mod locked_queue;
mod loom_shim;
mod ms_queue;

pub use backoff_queue::BackoffBatchQueue;
pub use batch_queue::BatchQueue;
pub use lock::{ClhLock, SpinLock, TasLock};
pub use locked_queue::LockedQueue;
pub use ms_queue::MsQueue;
