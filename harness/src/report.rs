use crate::config::Config;
use crate::metrics::Summary;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Renders a final report to the configured destination. Per §7, a
/// failure writing the report is diagnostic, not authoritative: it is
/// logged and swallowed rather than propagated, since the benchmark run
/// itself already completed successfully by the time this is called.
pub fn emit(config: &Config, summary: Summary, wall_clock: Duration) {
    let body = format!(
        "queue={} producers={} consumers={} items_per_producer={} batch_threshold={}\n\
         wall_clock_ms={} {}\n",
        config.queue,
        config.producers,
        config.consumers,
        config.items_per_producer,
        config.batch_threshold,
        wall_clock.as_millis(),
        summary,
    );

    match &config.report {
        None => print!("{body}"),
        Some(path) => {
            if let Err(err) = write_to_file(path, &body) {
                warn!(%err, path = %path.display(), "failed to write report, printing to stdout instead");
                print!("{body}");
            }
        }
    }
}

fn write_to_file(path: &Path, body: &str) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(body.as_bytes())
}
