// Adapter Factory - one presentation adapter per discovered queue

use crate::domain::queue::LEGACY_BULL_PREFIX;
use crate::domain::{
    AdapterConstructionError, BullMqQueueOptions, BullQueueOptions, ConnectionDescriptor,
    QueueAdapter, QueueBinding, QueueName, RedisConnectionOptions, RuntimeVersion,
};
use crate::port::QueueConnector;
use std::sync::Arc;

/// Build the adapter for `name`, branching once on `runtime`.
///
/// # Arguments
///
/// * `connector` - Runtime client bindings
/// * `name` - Discovered queue name
/// * `connection` - Resolved store connection
/// * `runtime` - Process-wide runtime selector
/// * `prefix` - Namespace prefix; only runtime B receives it
///
/// # Errors
/// - AdapterConstructionError::InvalidName for a blank queue name
/// - whatever the connector reports for this queue
pub fn build(
    connector: &dyn QueueConnector,
    name: &QueueName,
    connection: &ConnectionDescriptor,
    runtime: RuntimeVersion,
    prefix: Option<&str>,
) -> Result<QueueAdapter, AdapterConstructionError> {
    if name.is_empty() {
        return Err(AdapterConstructionError::InvalidName(name.to_string()));
    }

    let redis = RedisConnectionOptions::from(connection);
    let prefix = prefix.filter(|p| !p.is_empty());

    match runtime {
        RuntimeVersion::Bull => {
            let options = BullQueueOptions { redis };
            let handle = connector.open_bull(name, &options)?;
            Ok(QueueAdapter::Bull(QueueBinding::new(
                name.clone(),
                LEGACY_BULL_PREFIX,
                handle,
            )))
        }
        RuntimeVersion::BullMq => {
            let options = BullMqQueueOptions {
                connection: redis,
                prefix: prefix.map(str::to_string),
            };
            let handle = connector.open_bullmq(name, &options)?;
            Ok(QueueAdapter::BullMq(QueueBinding::new(
                name.clone(),
                prefix.unwrap_or(LEGACY_BULL_PREFIX),
                handle,
            )))
        }
    }
}

/// Adapter factory bound to the process-wide connection and runtime selection
pub struct AdapterFactory {
    connector: Arc<dyn QueueConnector>,
    connection: ConnectionDescriptor,
    runtime: RuntimeVersion,
    prefix: Option<String>,
}

impl AdapterFactory {
    pub fn new(
        connector: Arc<dyn QueueConnector>,
        connection: ConnectionDescriptor,
        runtime: RuntimeVersion,
        prefix: Option<String>,
    ) -> Self {
        Self {
            connector,
            connection,
            runtime,
            prefix,
        }
    }

    pub fn runtime(&self) -> RuntimeVersion {
        self.runtime
    }

    /// Build the adapter for one queue
    pub fn create(&self, name: &QueueName) -> Result<QueueAdapter, AdapterConstructionError> {
        build(
            self.connector.as_ref(),
            name,
            &self.connection,
            self.runtime,
            self.prefix.as_deref(),
        )
    }
}
