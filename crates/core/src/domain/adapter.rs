// Queue Adapter - uniform capability set over both runtime bindings

use crate::domain::queue::{
    JobCounts, JobStatus, JobSummary, QueueMetadata, QueueName, RuntimeVersion,
};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors reading queue state from the store
#[derive(Error, Debug)]
pub enum QueueReadError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store command failed: {0}")]
    Command(String),

    #[error("Status {status} is not supported by the {runtime} runtime")]
    UnsupportedStatus {
        status: JobStatus,
        runtime: RuntimeVersion,
    },
}

/// Read-only handle onto a single queue, produced by a runtime binding
#[async_trait]
pub trait QueueHandle: Send + Sync {
    /// Whether the queue is paused
    async fn is_paused(&self) -> Result<bool, QueueReadError>;

    /// Count jobs in every status bucket the runtime knows about
    async fn job_counts(&self) -> Result<JobCounts, QueueReadError>;

    /// List jobs in `status`, newest first, for the inclusive index range
    async fn list_jobs(
        &self,
        status: JobStatus,
        start: usize,
        end: usize,
    ) -> Result<Vec<JobSummary>, QueueReadError>;
}

/// A queue handle plus the identity it was built for
#[derive(Clone)]
pub struct QueueBinding {
    name: QueueName,
    prefix: String,
    handle: Arc<dyn QueueHandle>,
}

impl QueueBinding {
    pub fn new(name: QueueName, prefix: impl Into<String>, handle: Arc<dyn QueueHandle>) -> Self {
        Self {
            name,
            prefix: prefix.into(),
            handle,
        }
    }
}

/// Presentation adapter for one discovered queue.
///
/// Exactly one variant per runtime generation. Callers use the methods below
/// and never need to match on the variant.
#[derive(Clone)]
pub enum QueueAdapter {
    Bull(QueueBinding),
    BullMq(QueueBinding),
}

impl QueueAdapter {
    fn binding(&self) -> &QueueBinding {
        match self {
            QueueAdapter::Bull(b) | QueueAdapter::BullMq(b) => b,
        }
    }

    pub fn name(&self) -> &QueueName {
        &self.binding().name
    }

    pub fn prefix(&self) -> &str {
        &self.binding().prefix
    }

    pub fn runtime(&self) -> RuntimeVersion {
        match self {
            QueueAdapter::Bull(_) => RuntimeVersion::Bull,
            QueueAdapter::BullMq(_) => RuntimeVersion::BullMq,
        }
    }

    pub async fn metadata(&self) -> Result<QueueMetadata, QueueReadError> {
        let binding = self.binding();
        let paused = binding.handle.is_paused().await?;

        Ok(QueueMetadata {
            name: binding.name.clone(),
            prefix: binding.prefix.clone(),
            runtime: self.runtime(),
            paused,
        })
    }

    pub async fn job_counts(&self) -> Result<JobCounts, QueueReadError> {
        self.binding().handle.job_counts().await
    }

    pub async fn list_jobs(
        &self,
        status: JobStatus,
        start: usize,
        end: usize,
    ) -> Result<Vec<JobSummary>, QueueReadError> {
        if end < start {
            return Ok(Vec::new());
        }
        self.binding().handle.list_jobs(status, start, end).await
    }
}

impl fmt::Debug for QueueAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueAdapter")
            .field("runtime", &self.runtime())
            .field("name", self.name())
            .field("prefix", &self.prefix())
            .finish()
    }
}
