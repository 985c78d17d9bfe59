use crate::error::HarnessError;
use clap::Parser;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Which queue implementation the harness drives for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueKind {
    LockTas,
    LockClh,
    Ms,
    Batch,
    BackoffBatch,
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueueKind::LockTas => "lock-tas",
            QueueKind::LockClh => "lock-clh",
            QueueKind::Ms => "ms",
            QueueKind::Batch => "batch",
            QueueKind::BackoffBatch => "backoff-batch",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for QueueKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lock-tas" => Ok(QueueKind::LockTas),
            "lock-clh" => Ok(QueueKind::LockClh),
            "ms" => Ok(QueueKind::Ms),
            "batch" => Ok(QueueKind::Batch),
            "backoff-batch" => Ok(QueueKind::BackoffBatch),
            other => Err(HarnessError::UnknownQueueKind {
                given: other.to_string(),
            }),
        }
    }
}

/// Command-line flags. A `--config` file, if given, supplies defaults
/// that these flags override, so a shared TOML profile can be checked
/// in and individual runs can still tweak one knob from the CLI.
#[derive(Debug, Parser)]
#[command(name = "cq-harness", about = "Synthetic producer/consumer queue benchmark")]
pub struct Cli {
    /// Optional TOML file providing defaults for the other options.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// One of lock-tas, lock-clh, ms, batch, backoff-batch.
    #[arg(long)]
    pub queue: Option<String>,

    #[arg(long)]
    pub producers: Option<usize>,

    #[arg(long)]
    pub consumers: Option<usize>,

    #[arg(long)]
    pub items_per_producer: Option<usize>,

    #[arg(long)]
    pub batch_threshold: Option<usize>,

    /// Where the final report is written; stdout if omitted.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    queue: Option<String>,
    producers: Option<usize>,
    consumers: Option<usize>,
    items_per_producer: Option<usize>,
    batch_threshold: Option<usize>,
    report: Option<PathBuf>,
}

/// The fully resolved configuration a run executes with, after merging
/// CLI flags over an optional config file over built-in defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub queue: QueueKind,
    pub producers: usize,
    pub consumers: usize,
    pub items_per_producer: usize,
    pub batch_threshold: usize,
    pub report: Option<PathBuf>,
}

const DEFAULT_PRODUCERS: usize = 4;
const DEFAULT_CONSUMERS: usize = 4;
const DEFAULT_ITEMS_PER_PRODUCER: usize = 10_000;
const DEFAULT_BATCH_THRESHOLD: usize = 16;
const DEFAULT_QUEUE: &str = "ms";

impl Config {
    pub fn resolve(cli: Cli) -> Result<Config, HarnessError> {
        let file = match &cli.config {
            Some(path) => Self::read_file(path)?,
            None => FileConfig::default(),
        };

        let queue_str = cli
            .queue
            .or(file.queue)
            .unwrap_or_else(|| DEFAULT_QUEUE.to_string());
        let queue: QueueKind = queue_str.parse()?;

        let producers = cli.producers.or(file.producers).unwrap_or(DEFAULT_PRODUCERS);
        let consumers = cli.consumers.or(file.consumers).unwrap_or(DEFAULT_CONSUMERS);
        let items_per_producer = cli
            .items_per_producer
            .or(file.items_per_producer)
            .unwrap_or(DEFAULT_ITEMS_PER_PRODUCER);
        let batch_threshold = cli
            .batch_threshold
            .or(file.batch_threshold)
            .unwrap_or(DEFAULT_BATCH_THRESHOLD);
        let report = cli.report.or(file.report);

        if producers == 0 || consumers == 0 {
            return Err(HarnessError::InvalidWorkerCount { producers, consumers });
        }
        if batch_threshold < 2 {
            return Err(HarnessError::InvalidBatchThreshold { given: batch_threshold });
        }

        Ok(Config {
            queue,
            producers,
            consumers,
            items_per_producer,
            batch_threshold,
            report,
        })
    }

    fn read_file(path: &PathBuf) -> Result<FileConfig, HarnessError> {
        let text = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| HarnessError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }
}
