use super::SpinLock;
use crate::loom_shim::{spin_loop_hint, AtomicBool, Ordering};

/// A single atomic flag, globally spun on by every waiter.
///
/// Not fair: a thread can starve under contention, and every waiter
/// hammers the same cache line. Baseline for comparing against
/// [`ClhLock`](super::ClhLock).
pub struct TasLock {
    locked: AtomicBool,
}

impl Default for TasLock {
    fn default() -> Self {
        TasLock {
            locked: AtomicBool::new(false),
        }
    }
}

impl SpinLock for TasLock {
    fn acquire(&self) {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.locked.load(Ordering::Relaxed) {
                spin_loop_hint();
            }
        }
    }

    fn release(&self) {
        self.locked.store(false, Ordering::Release);
    }
}
