// Central Error Type for the Application

use crate::domain::QueueReadError;
use crate::port::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Store unreachable, scan failure or timeout. Aborts a discovery pass.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Store connection failed: {0}")]
    Connect(#[source] StoreError),

    #[error("Keyspace scan failed: {0}")]
    Scan(#[source] StoreError),

    #[error("Discovery timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors surfaced to the composition root
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Queue read error: {0}")]
    QueueRead(#[from] QueueReadError),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
