use crate::metrics::Metrics;
use crate::queue_select::AnyQueue;
use crate::request::WorkItem;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Dequeues in a loop until a poison item is observed (§6's poison
/// protocol). A `None` result is spurious emptiness, not termination;
/// the loop just retries, yielding between attempts so a spinning
/// consumer doesn't starve a lock-based variant's holder.
pub fn run(id: usize, queue: Arc<AnyQueue<WorkItem<(usize, Instant)>>>, metrics: Arc<Metrics>) -> usize {
    debug!(consumer = id, "consumer starting");
    let mut observed = 0usize;
    loop {
        let start = Instant::now();
        let item = queue.dequeue();
        match item {
            Some(WorkItem::Data((_, enqueued_at))) => {
                metrics.record_dequeue(start.elapsed().as_nanos() as u64);
                let now = Instant::now();
                metrics.record_request_latency(now.saturating_duration_since(enqueued_at).as_nanos() as u64);
                observed += 1;
            }
            Some(WorkItem::Poison) => {
                metrics.record_control_dequeue();
                debug!(consumer = id, observed, "consumer observed poison, exiting");
                return observed;
            }
            None => std::thread::yield_now(),
        }
    }
}

/// Logs if a consumer thread panicked or otherwise never returned an
/// observed-poison count, matching §9's "warn on anomalies" convention.
pub fn warn_if_missing_poison(id: usize, joined: bool) {
    if !joined {
        warn!(consumer = id, "consumer exited without observing poison");
    }
}
