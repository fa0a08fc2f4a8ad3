// Redis Queue Connector - opens runtime handles for discovered queues

use crate::bull::BullQueue;
use crate::bullmq::BullMqQueue;
use crate::connection::create_client;
use queueboard_core::domain::queue::LEGACY_BULL_PREFIX;
use queueboard_core::domain::{
    AdapterConstructionError, BullMqQueueOptions, BullQueueOptions, ConnectionDescriptor,
    QueueHandle, QueueName, RedisConnectionOptions,
};
use queueboard_core::port::QueueConnector;
use std::sync::Arc;
use tracing::debug;

/// Builds Bull and BullMQ inspectors from their client options.
///
/// Each handle owns its own client; connections are opened lazily on the
/// first read so construction never touches the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct RedisQueueConnector;

impl RedisQueueConnector {
    pub fn new() -> Self {
        Self
    }
}

fn client_for(
    name: &QueueName,
    options: &RedisConnectionOptions,
) -> Result<redis::Client, AdapterConstructionError> {
    create_client(&ConnectionDescriptor::from(options)).map_err(|e| {
        AdapterConstructionError::InvalidOptions {
            queue: name.to_string(),
            reason: e.to_string(),
        }
    })
}

impl QueueConnector for RedisQueueConnector {
    fn open_bull(
        &self,
        name: &QueueName,
        options: &BullQueueOptions,
    ) -> Result<Arc<dyn QueueHandle>, AdapterConstructionError> {
        let client = client_for(name, &options.redis)?;
        debug!(queue = %name, "Opened Bull queue");
        Ok(Arc::new(BullQueue::new(client, name.clone())))
    }

    fn open_bullmq(
        &self,
        name: &QueueName,
        options: &BullMqQueueOptions,
    ) -> Result<Arc<dyn QueueHandle>, AdapterConstructionError> {
        let client = client_for(name, &options.connection)?;
        let prefix = options.prefix.as_deref().unwrap_or(LEGACY_BULL_PREFIX);
        debug!(queue = %name, prefix = %prefix, "Opened BullMQ queue");
        Ok(Arc::new(BullMqQueue::new(client, prefix, name.clone())))
    }
}
