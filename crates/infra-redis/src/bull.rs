// Bull queue inspector (legacy runtime)

use crate::reader::{Layout, QueueReader, StatusKey};
use async_trait::async_trait;
use queueboard_core::domain::{
    JobCounts, JobStatus, JobSummary, QueueHandle, QueueName, QueueReadError, RuntimeVersion,
};
use queueboard_core::domain::queue::LEGACY_BULL_PREFIX;

/// Read-only view of a Bull queue stored under `bull:<name>:*`
pub struct BullQueue {
    reader: QueueReader,
}

impl BullQueue {
    pub fn new(client: redis::Client, name: QueueName) -> Self {
        Self {
            reader: QueueReader::new(client, LEGACY_BULL_PREFIX, name),
        }
    }

    pub fn name(&self) -> &QueueName {
        self.reader.name()
    }

    pub fn prefix(&self) -> &str {
        self.reader.prefix()
    }
}

fn status_key(status: JobStatus) -> StatusKey {
    match status {
        JobStatus::Waiting => Some((Layout::List, "wait")),
        JobStatus::Active => Some((Layout::List, "active")),
        JobStatus::Paused => Some((Layout::List, "paused")),
        JobStatus::Completed => Some((Layout::SortedSet, "completed")),
        JobStatus::Failed => Some((Layout::SortedSet, "failed")),
        JobStatus::Delayed => Some((Layout::SortedSet, "delayed")),
        JobStatus::Prioritized | JobStatus::WaitingChildren => None,
    }
}

#[async_trait]
impl QueueHandle for BullQueue {
    async fn is_paused(&self) -> Result<bool, QueueReadError> {
        self.reader.exists("meta-paused").await
    }

    async fn job_counts(&self) -> Result<JobCounts, QueueReadError> {
        self.reader.counts(status_key).await
    }

    async fn list_jobs(
        &self,
        status: JobStatus,
        start: usize,
        end: usize,
    ) -> Result<Vec<JobSummary>, QueueReadError> {
        let (layout, suffix) = status_key(status).ok_or(QueueReadError::UnsupportedStatus {
            status,
            runtime: RuntimeVersion::Bull,
        })?;
        self.reader.list(layout, suffix, start, end).await
    }
}
