use crate::lock::SpinLock;
use std::collections::VecDeque;
use std::sync::Mutex as StdLock;

/// A coarse-grained FIFO queue behind a spin-lock, generic over the
/// lock discipline (`TasLock` or `ClhLock`). The baseline the lock-free
/// variants are measured against.
pub struct LockedQueue<T, L: SpinLock> {
    lock: L,
    items: StdLock<VecDeque<T>>,
}

impl<T, L: SpinLock> Default for LockedQueue<T, L> {
    fn default() -> Self {
        LockedQueue {
            lock: L::default(),
            items: StdLock::new(VecDeque::new()),
        }
    }
}

impl<T, L: SpinLock> LockedQueue<T, L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, item: T) {
        self.lock.acquire();
        // StdLock is just interior mutability here; the spin-lock above
        // is the only thing contended.
        let mut items = self.items.lock().expect("queue storage poisoned");
        items.push_back(item);
        drop(items);
        self.lock.release();
    }

    pub fn dequeue(&self) -> Option<T> {
        self.lock.acquire();
        let mut items = self.items.lock().expect("queue storage poisoned");
        let item = items.pop_front();
        drop(items);
        self.lock.release();
        item
    }

    /// Informational only, may be stale by the time the caller reads it.
    pub fn len(&self) -> usize {
        self.lock.acquire();
        let n = self.items.lock().expect("queue storage poisoned").len();
        self.lock.release();
        n
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
