use crate::batch_core::{BatchCore, DEFAULT_BATCH_THRESHOLD};

/// Amortises the Michael-Scott CAS over whole batches: each thread
/// accumulates up to `batch_threshold` items in a private buffer and
/// publishes them with a single CAS on the shared tail.
///
/// Items within one batch become visible atomically at the CAS that
/// installs the batch's first node as `tail.next`. A thread's buffer
/// only publishes early if a dequeuer finds the shared list empty while
/// that thread still has a pending batch, see [`Self::dequeue`].
pub struct BatchQueue<T> {
    core: BatchCore<T>,
}

impl<T> Default for BatchQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BatchQueue<T> {
    pub fn new() -> Self {
        Self::with_batch_threshold(DEFAULT_BATCH_THRESHOLD)
    }

    /// `threshold` is clamped to a minimum of 2; a "batch" of one item
    /// is just an ordinary enqueue, handled by [`crate::MsQueue`].
    pub fn with_batch_threshold(threshold: usize) -> Self {
        BatchQueue {
            core: BatchCore::new(threshold),
        }
    }

    pub fn enqueue(&self, value: T) {
        self.core.enqueue(value, || {});
    }

    /// If the shared list is empty but this thread holds a pending
    /// batch, that batch is spliced first so a producer that also
    /// consumes never deadlocks on its own unpublished items.
    pub fn dequeue(&self) -> Option<T> {
        self.core.dequeue()
    }

    pub fn flush_local(&self) {
        self.core.flush_local();
    }
}
