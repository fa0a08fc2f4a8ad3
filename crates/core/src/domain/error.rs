// Domain Error Types

use thiserror::Error;

/// Malformed configuration input. Always recoverable: callers log and fall back.
#[derive(Error, Debug)]
pub enum ConfigParseError {
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Connection URL has no usable host: {0}")]
    MissingHost(String),
}

/// A single queue could not be turned into an adapter.
#[derive(Error, Debug)]
pub enum AdapterConstructionError {
    #[error("Invalid queue name: {0:?}")]
    InvalidName(String),

    #[error("Invalid connection options for queue {queue}: {reason}")]
    InvalidOptions { queue: String, reason: String },

    #[error("Queue client construction failed for {queue}: {reason}")]
    Client { queue: String, reason: String },
}
