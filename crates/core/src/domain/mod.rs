// Domain Layer - Connection, options and queue models

pub mod adapter;
pub mod client_options;
pub mod connection;
pub mod error;
pub mod options;
pub mod queue;

// Re-exports
pub use adapter::{QueueAdapter, QueueBinding, QueueHandle, QueueReadError};
pub use client_options::{BullMqQueueOptions, BullQueueOptions, RedisConnectionOptions};
pub use connection::{ConnectionDescriptor, DiscreteConnectionFields};
pub use error::{AdapterConstructionError, ConfigParseError};
pub use options::{OptionValue, OptionsTree};
pub use queue::{JobCounts, JobStatus, JobSummary, QueueMetadata, QueueName, RuntimeVersion};
