use clap::Parser;
use cq_harness::config::{Cli, Config};
use cq_harness::{report, run_workload};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(cli)?;

    let (summary, wall_clock) = run_workload(&config);
    report::emit(&config, summary, wall_clock);

    Ok(())
}
