use crate::config::QueueKind;
use cq_queue::{BackoffBatchQueue, BatchQueue, ClhLock, LockedQueue, MsQueue, TasLock};

/// Runtime selection over the five queue variants. The core crate
/// itself stays generic/monomorphised (§9's "capability interface, not
/// inheritance" note); this enum exists only so the harness can pick a
/// variant from a CLI flag instead of at compile time, and is scaffolding
/// around the core, not part of it.
pub enum AnyQueue<T> {
    LockTas(LockedQueue<T, TasLock>),
    LockClh(LockedQueue<T, ClhLock>),
    Ms(MsQueue<T>),
    Batch(BatchQueue<T>),
    BackoffBatch(BackoffBatchQueue<T>),
}

impl<T> AnyQueue<T> {
    pub fn new(kind: QueueKind, batch_threshold: usize) -> Self {
        match kind {
            QueueKind::LockTas => AnyQueue::LockTas(LockedQueue::new()),
            QueueKind::LockClh => AnyQueue::LockClh(LockedQueue::new()),
            QueueKind::Ms => AnyQueue::Ms(MsQueue::new()),
            QueueKind::Batch => AnyQueue::Batch(BatchQueue::with_batch_threshold(batch_threshold)),
            QueueKind::BackoffBatch => {
                AnyQueue::BackoffBatch(BackoffBatchQueue::with_batch_threshold(batch_threshold))
            }
        }
    }

    pub fn enqueue(&self, value: T) {
        match self {
            AnyQueue::LockTas(q) => q.enqueue(value),
            AnyQueue::LockClh(q) => q.enqueue(value),
            AnyQueue::Ms(q) => q.enqueue(value),
            AnyQueue::Batch(q) => q.enqueue(value),
            AnyQueue::BackoffBatch(q) => q.enqueue(value),
        }
    }

    pub fn dequeue(&self) -> Option<T> {
        match self {
            AnyQueue::LockTas(q) => q.dequeue(),
            AnyQueue::LockClh(q) => q.dequeue(),
            AnyQueue::Ms(q) => q.dequeue(),
            AnyQueue::Batch(q) => q.dequeue(),
            AnyQueue::BackoffBatch(q) => q.dequeue(),
        }
    }

    /// Publishes the calling thread's pending batch immediately. A
    /// no-op for the non-batching variants; a producer can call this
    /// unconditionally after its last enqueue regardless of which
    /// variant was selected.
    pub fn flush_local(&self) {
        match self {
            AnyQueue::Batch(q) => q.flush_local(),
            AnyQueue::BackoffBatch(q) => q.flush_local(),
            _ => {}
        }
    }
}
