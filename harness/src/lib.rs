pub mod config;
pub mod consumer;
pub mod error;
pub mod metrics;
pub mod producer;
pub mod queue_select;
pub mod report;
pub mod request;

pub use config::Config;
pub use metrics::Summary;

use metrics::Metrics;
use queue_select::AnyQueue;
use request::WorkItem;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Runs one full producer/consumer workload against the configured
/// queue variant and returns the aggregated metrics summary plus the
/// wall-clock duration of the run. Shared between the binary and the
/// criterion benches so both drive identically-shaped workloads.
pub fn run_workload(config: &Config) -> (metrics::Summary, Duration) {
    let queue: Arc<AnyQueue<WorkItem<(usize, Instant)>>> =
        Arc::new(AnyQueue::new(config.queue, config.batch_threshold));
    let metrics = Arc::new(Metrics::new());

    info!(
        queue = %config.queue,
        producers = config.producers,
        consumers = config.consumers,
        items_per_producer = config.items_per_producer,
        "starting run"
    );

    let start = Instant::now();

    let producer_handles: Vec<_> = (0..config.producers)
        .map(|id| {
            let queue = Arc::clone(&queue);
            let metrics = Arc::clone(&metrics);
            let items_per_producer = config.items_per_producer;
            std::thread::spawn(move || producer::run(id, items_per_producer, queue, metrics))
        })
        .collect();

    let consumer_handles: Vec<_> = (0..config.consumers)
        .map(|id| {
            let queue = Arc::clone(&queue);
            let metrics = Arc::clone(&metrics);
            std::thread::spawn(move || consumer::run(id, queue, metrics))
        })
        .collect();

    for handle in producer_handles {
        handle.join().expect("producer thread panicked");
    }
    producer::send_poison(&queue, config.consumers, &metrics);

    for (id, handle) in consumer_handles.into_iter().enumerate() {
        let joined = handle.join();
        consumer::warn_if_missing_poison(id, joined.is_ok());
        joined.expect("consumer thread panicked");
    }

    let wall_clock = start.elapsed();
    info!(wall_clock_ms = wall_clock.as_millis(), "run complete");
    (metrics.summary(), wall_clock)
}
