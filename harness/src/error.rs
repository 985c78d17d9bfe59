use thiserror::Error;

/// Errors surfaced by the harness binary. The core `queue` crate has no
/// error type of its own (every operation is infallible per its
/// contract); everything here is about getting the harness itself
/// configured and reporting out, not about queue semantics.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid queue selector {given:?}: expected one of lock-tas, lock-clh, ms, batch, backoff-batch")]
    UnknownQueueKind { given: String },

    #[error("config file {path} could not be read: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path} is not valid TOML: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("producer count and consumer count must both be at least 1, got {producers}/{consumers}")]
    InvalidWorkerCount { producers: usize, consumers: usize },

    #[error("batch_threshold must be at least 2, got {given}")]
    InvalidBatchThreshold { given: usize },
}
