// Queue Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default key prefix of the legacy Bull runtime
pub const LEGACY_BULL_PREFIX: &str = "bull";

/// Logical queue name extracted from a store key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QueueName(String);

impl QueueName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// `<prefix>:<name>:<suffix...>` => `<name>`
    ///
    /// A key without any delimiter is returned whole. Any other key that does
    /// not have a non-empty prefix, name and suffix yields `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        if !key.contains(':') {
            return Some(Self::new(key));
        }

        let mut parts = key.splitn(3, ':');
        let prefix = parts.next()?;
        let name = parts.next()?;
        let suffix = parts.next()?;

        if prefix.is_empty() || name.is_empty() || suffix.is_empty() {
            return None;
        }
        Some(Self::new(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Queue client generation the dashboard talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuntimeVersion {
    /// Legacy `bull` client (runtime A)
    Bull,
    /// `bullmq` client (runtime B)
    #[default]
    BullMq,
}

impl RuntimeVersion {
    /// Parse a `BULL_VERSION` selector. Returns `None` for unrecognised values.
    pub fn from_selector(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BULL" => Some(RuntimeVersion::Bull),
            "BULLMQ" => Some(RuntimeVersion::BullMq),
            _ => None,
        }
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeVersion::Bull => write!(f, "BULL"),
            RuntimeVersion::BullMq => write!(f, "BULLMQ"),
        }
    }
}

/// Job status buckets a queue can be inspected by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Waiting,
    Active,
    Completed,
    Failed,
    Delayed,
    Paused,
    Prioritized,
    WaitingChildren,
}

impl JobStatus {
    pub const ALL: [JobStatus; 8] = [
        JobStatus::Waiting,
        JobStatus::Active,
        JobStatus::Completed,
        JobStatus::Failed,
        JobStatus::Delayed,
        JobStatus::Paused,
        JobStatus::Prioritized,
        JobStatus::WaitingChildren,
    ];
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Waiting => "waiting",
            JobStatus::Active => "active",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Delayed => "delayed",
            JobStatus::Paused => "paused",
            JobStatus::Prioritized => "prioritized",
            JobStatus::WaitingChildren => "waiting-children",
        };
        f.write_str(s)
    }
}

/// Per-status job counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCounts {
    pub waiting: u64,
    pub active: u64,
    pub completed: u64,
    pub failed: u64,
    pub delayed: u64,
    pub paused: u64,
    pub prioritized: u64,
    pub waiting_children: u64,
}

impl JobCounts {
    pub fn get(&self, status: JobStatus) -> u64 {
        match status {
            JobStatus::Waiting => self.waiting,
            JobStatus::Active => self.active,
            JobStatus::Completed => self.completed,
            JobStatus::Failed => self.failed,
            JobStatus::Delayed => self.delayed,
            JobStatus::Paused => self.paused,
            JobStatus::Prioritized => self.prioritized,
            JobStatus::WaitingChildren => self.waiting_children,
        }
    }

    pub fn set(&mut self, status: JobStatus, count: u64) {
        let slot = match status {
            JobStatus::Waiting => &mut self.waiting,
            JobStatus::Active => &mut self.active,
            JobStatus::Completed => &mut self.completed,
            JobStatus::Failed => &mut self.failed,
            JobStatus::Delayed => &mut self.delayed,
            JobStatus::Paused => &mut self.paused,
            JobStatus::Prioritized => &mut self.prioritized,
            JobStatus::WaitingChildren => &mut self.waiting_children,
        };
        *slot = count;
    }

    pub fn total(&self) -> u64 {
        JobStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Queue metadata shown in the board header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMetadata {
    pub name: QueueName,
    pub prefix: String,
    pub runtime: RuntimeVersion,
    pub paused: bool,
}

/// Read-only view of one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: String,
    pub name: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub attempts_made: u32,
    pub failed_reason: Option<String>,
    pub data: Option<serde_json::Value>,
}
