use std::sync::atomic::{AtomicU64, Ordering};

/// A concurrent-safe accumulator for the five counters/durations the
/// benchmark workload reports (§6's metrics sink): data-item
/// enqueue/dequeue counts, poison enqueue/dequeue counts, and a running
/// total of request latency, each paired with a count so an average can
/// be derived without dividing by zero.
#[derive(Default)]
pub struct Metrics {
    enqueue_count: AtomicU64,
    dequeue_count: AtomicU64,
    control_enqueue_count: AtomicU64,
    control_dequeue_count: AtomicU64,
    latency_total_ns: AtomicU64,
    latency_sample_count: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics::default()
    }

    pub fn record_enqueue(&self, _duration_ns: u64) {
        self.enqueue_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dequeue(&self, _duration_ns: u64) {
        self.dequeue_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_control_enqueue(&self) {
        self.control_enqueue_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_control_dequeue(&self) {
        self.control_dequeue_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_request_latency(&self, duration_ns: u64) {
        self.latency_total_ns.fetch_add(duration_ns, Ordering::Relaxed);
        self.latency_sample_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> Summary {
        let samples = self.latency_sample_count.load(Ordering::Relaxed);
        let total = self.latency_total_ns.load(Ordering::Relaxed);
        Summary {
            enqueues: self.enqueue_count.load(Ordering::Relaxed),
            dequeues: self.dequeue_count.load(Ordering::Relaxed),
            control_enqueues: self.control_enqueue_count.load(Ordering::Relaxed),
            control_dequeues: self.control_dequeue_count.load(Ordering::Relaxed),
            // Divisions by zero yield zero, not NaN or a panic.
            average_latency_ns: if samples == 0 { 0 } else { total / samples },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub enqueues: u64,
    pub dequeues: u64,
    pub control_enqueues: u64,
    pub control_dequeues: u64,
    pub average_latency_ns: u64,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "enqueues={} dequeues={} control_enqueues={} control_dequeues={} avg_latency_ns={}",
            self.enqueues, self.dequeues, self.control_enqueues, self.control_dequeues, self.average_latency_ns
        )
    }
}
