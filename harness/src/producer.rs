use crate::metrics::Metrics;
use crate::queue_select::AnyQueue;
use crate::request::WorkItem;
use rand::Rng;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Enqueues `items_per_producer` items, each tagged with its own
/// enqueue timestamp so a consumer can derive request latency, then
/// flushes any pending batch (a no-op for non-batching variants) so a
/// consumer is never left waiting on an unpublished tail.
pub fn run(
    id: usize,
    items_per_producer: usize,
    queue: Arc<AnyQueue<WorkItem<(usize, Instant)>>>,
    metrics: Arc<Metrics>,
) {
    debug!(producer = id, items_per_producer, "producer starting");
    let mut rng = rand::thread_rng();
    for i in 0..items_per_producer {
        // A small random jitter models the synthetic server workload
        // from §1 rather than a tight back-to-back enqueue storm.
        let jitter_ns: u64 = rng.gen_range(0..2_000);
        std::thread::sleep(std::time::Duration::from_nanos(jitter_ns));

        let start = Instant::now();
        queue.enqueue(WorkItem::Data((id * items_per_producer + i, start)));
        metrics.record_enqueue(start.elapsed().as_nanos() as u64);
    }
    queue.flush_local();
    debug!(producer = id, "producer finished");
}

/// Enqueues one poison item per consumer, called once after every
/// producer has finished (§6's poison protocol).
pub fn send_poison(queue: &AnyQueue<WorkItem<(usize, Instant)>>, consumers: usize, metrics: &Metrics) {
    for _ in 0..consumers {
        queue.enqueue(WorkItem::Poison);
        metrics.record_control_enqueue();
    }
    queue.flush_local();
}
