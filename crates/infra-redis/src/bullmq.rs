// BullMQ queue inspector

use crate::reader::{Layout, QueueReader};
use async_trait::async_trait;
use queueboard_core::domain::{
    JobCounts, JobStatus, JobSummary, QueueHandle, QueueName, QueueReadError,
};

/// Read-only view of a BullMQ queue stored under `<prefix>:<name>:*`
pub struct BullMqQueue {
    reader: QueueReader,
}

impl BullMqQueue {
    pub fn new(client: redis::Client, prefix: impl Into<String>, name: QueueName) -> Self {
        Self {
            reader: QueueReader::new(client, prefix, name),
        }
    }

    pub fn name(&self) -> &QueueName {
        self.reader.name()
    }

    pub fn prefix(&self) -> &str {
        self.reader.prefix()
    }
}

fn bucket(status: JobStatus) -> (Layout, &'static str) {
    match status {
        JobStatus::Waiting => (Layout::List, "wait"),
        JobStatus::Active => (Layout::List, "active"),
        JobStatus::Paused => (Layout::List, "paused"),
        JobStatus::Completed => (Layout::SortedSet, "completed"),
        JobStatus::Failed => (Layout::SortedSet, "failed"),
        JobStatus::Delayed => (Layout::SortedSet, "delayed"),
        JobStatus::Prioritized => (Layout::SortedSet, "prioritized"),
        JobStatus::WaitingChildren => (Layout::SortedSet, "waiting-children"),
    }
}

#[async_trait]
impl QueueHandle for BullMqQueue {
    // Pausing sets `paused` on the meta hash
    async fn is_paused(&self) -> Result<bool, QueueReadError> {
        self.reader.hash_field_exists("meta", "paused").await
    }

    async fn job_counts(&self) -> Result<JobCounts, QueueReadError> {
        self.reader.counts(|status| Some(bucket(status))).await
    }

    async fn list_jobs(
        &self,
        status: JobStatus,
        start: usize,
        end: usize,
    ) -> Result<Vec<JobSummary>, QueueReadError> {
        let (layout, suffix) = bucket(status);
        self.reader.list(layout, suffix, start, end).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uses_configured_prefix() {
        let client = redis::Client::open("redis://127.0.0.1:6379/0").unwrap();
        let queue = BullMqQueue::new(client, "jobs", QueueName::new("emails"));

        assert_eq!(queue.prefix(), "jobs");
        assert_eq!(queue.name().as_str(), "emails");
    }

    #[test]
    fn test_bucket_layouts() {
        assert_eq!(bucket(JobStatus::Paused), (Layout::List, "paused"));
        assert_eq!(bucket(JobStatus::Prioritized), (Layout::SortedSet, "prioritized"));
        assert_eq!(
            bucket(JobStatus::WaitingChildren),
            (Layout::SortedSet, "waiting-children")
        );
    }
}
