// Shared read path for both queue runtimes

use chrono::DateTime;
use queueboard_core::domain::{JobCounts, JobStatus, JobSummary, QueueName, QueueReadError};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, RedisError};
use std::collections::HashMap;
use tokio::sync::OnceCell;

/// How a status bucket is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layout {
    /// LPUSH'd list, newest at index 0
    List,
    /// Sorted set scored by time, newest last
    SortedSet,
}

/// Where a status bucket lives: layout plus key suffix
pub(crate) type StatusKey = Option<(Layout, &'static str)>;

/// Key naming and store reads for `<prefix>:<name>:*`
pub(crate) struct QueueReader {
    client: redis::Client,
    conn: OnceCell<MultiplexedConnection>,
    prefix: String,
    name: QueueName,
}

impl QueueReader {
    pub(crate) fn new(client: redis::Client, prefix: impl Into<String>, name: QueueName) -> Self {
        Self {
            client,
            conn: OnceCell::new(),
            prefix: prefix.into(),
            name,
        }
    }

    pub(crate) fn name(&self) -> &QueueName {
        &self.name
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn key(&self, suffix: &str) -> String {
        format!("{}:{}:{}", self.prefix, self.name, suffix)
    }

    async fn connection(&self) -> Result<MultiplexedConnection, QueueReadError> {
        self.conn
            .get_or_try_init(|| async {
                self.client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| QueueReadError::Connection(e.to_string()))
            })
            .await
            .cloned()
    }

    pub(crate) async fn exists(&self, suffix: &str) -> Result<bool, QueueReadError> {
        let mut conn = self.connection().await?;
        let exists: bool = conn.exists(self.key(suffix)).await.map_err(command_error)?;
        Ok(exists)
    }

    pub(crate) async fn hash_field_exists(
        &self,
        suffix: &str,
        field: &str,
    ) -> Result<bool, QueueReadError> {
        let mut conn = self.connection().await?;
        let exists: bool = conn
            .hexists(self.key(suffix), field)
            .await
            .map_err(command_error)?;
        Ok(exists)
    }

    /// Count every status the runtime stores, in one round trip
    pub(crate) async fn counts(
        &self,
        status_key: impl Fn(JobStatus) -> StatusKey,
    ) -> Result<JobCounts, QueueReadError> {
        let mut pipe = redis::pipe();
        let mut asked = Vec::new();

        for status in JobStatus::ALL {
            if let Some((layout, suffix)) = status_key(status) {
                match layout {
                    Layout::List => pipe.llen(self.key(suffix)),
                    Layout::SortedSet => pipe.zcard(self.key(suffix)),
                };
                asked.push(status);
            }
        }

        let mut conn = self.connection().await?;
        let values: Vec<u64> = pipe.query_async(&mut conn).await.map_err(command_error)?;

        let mut counts = JobCounts::default();
        for (status, value) in asked.into_iter().zip(values) {
            counts.set(status, value);
        }
        Ok(counts)
    }

    /// Job summaries for the inclusive index range, newest first
    pub(crate) async fn list(
        &self,
        layout: Layout,
        suffix: &str,
        start: usize,
        end: usize,
    ) -> Result<Vec<JobSummary>, QueueReadError> {
        let mut conn = self.connection().await?;
        let key = self.key(suffix);
        let (start, end) = (redis_index(start), redis_index(end));

        let ids: Vec<String> = match layout {
            Layout::List => conn.lrange(&key, start, end).await,
            Layout::SortedSet => conn.zrevrange(&key, start, end).await,
        }
        .map_err(command_error)?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for id in &ids {
            pipe.hgetall(self.key(id));
        }
        let hashes: Vec<HashMap<String, String>> =
            pipe.query_async(&mut conn).await.map_err(command_error)?;

        // Jobs removed between the two reads come back as empty hashes
        Ok(ids
            .into_iter()
            .zip(hashes)
            .filter(|(_, fields)| !fields.is_empty())
            .map(|(id, fields)| job_summary(id, &fields))
            .collect())
    }
}

// Negative indexes count from the tail, so large offsets saturate instead of wrapping
fn redis_index(index: usize) -> isize {
    isize::try_from(index).unwrap_or(isize::MAX)
}

fn command_error(err: RedisError) -> QueueReadError {
    if err.is_connection_refusal() || err.is_io_error() {
        QueueReadError::Connection(err.to_string())
    } else {
        QueueReadError::Command(err.to_string())
    }
}

/// Build a summary from a job hash. Both runtimes share the field names,
/// except BullMQ's short `atm` for attempts.
pub(crate) fn job_summary(id: String, fields: &HashMap<String, String>) -> JobSummary {
    let field = |name: &str| fields.get(name).filter(|v| !v.is_empty()).cloned();

    let timestamp = field("timestamp")
        .and_then(|t| t.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis);

    let attempts_made = field("attemptsMade")
        .or_else(|| field("atm"))
        .and_then(|a| a.parse().ok())
        .unwrap_or(0);

    let data = field("data").map(|raw| {
        serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
    });

    JobSummary {
        id,
        name: field("name"),
        timestamp,
        attempts_made,
        failed_reason: field("failedReason"),
        data,
    }
}
