use crate::batch_core::{BatchCore, DEFAULT_BATCH_THRESHOLD};
use std::hint;
use std::time::{Duration, Instant};

const MIN_DELAY: Duration = Duration::from_nanos(50);
const MAX_DELAY: Duration = Duration::from_nanos(50_000);
const MAX_EXPONENT: u32 = 10;

/// Counts consecutive CAS losses in this splice attempt. The delay
/// doubles per loss up to `MAX_EXPONENT`, saturating at `MAX_DELAY`; the
/// wait busy-spins against `Instant::now`, never sleeps.
struct Backoff(u32);

impl Backoff {
    fn new() -> Self {
        Backoff(0)
    }

    fn spin(&mut self) {
        let exponent = self.0.min(MAX_EXPONENT);
        let delay = (MIN_DELAY * (1 << exponent)).min(MAX_DELAY);
        let until = Instant::now() + delay;
        while Instant::now() < until {
            hint::spin_loop();
        }
        self.0 += 1;
    }
}

/// Identical to [`BatchQueue`](crate::BatchQueue), except a splice that
/// loses the tail-link CAS backs off exponentially before retrying.
pub struct BackoffBatchQueue<T> {
    core: BatchCore<T>,
}

impl<T> Default for BackoffBatchQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BackoffBatchQueue<T> {
    pub fn new() -> Self {
        Self::with_batch_threshold(DEFAULT_BATCH_THRESHOLD)
    }

    pub fn with_batch_threshold(threshold: usize) -> Self {
        BackoffBatchQueue {
            core: BatchCore::new(threshold),
        }
    }

    pub fn enqueue(&self, value: T) {
        let mut backoff = Backoff::new();
        self.core.enqueue(value, move || backoff.spin());
    }

    pub fn dequeue(&self) -> Option<T> {
        self.core.dequeue()
    }

    pub fn flush_local(&self) {
        self.core.flush_local();
    }
}
