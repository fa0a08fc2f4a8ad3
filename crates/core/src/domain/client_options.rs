// Queue client option shapes
//
// Optional fields are omitted entirely when unset: the queue clients treat an
// explicitly present empty field differently from a missing one.

use crate::domain::connection::ConnectionDescriptor;
use serde::{Deserialize, Serialize};

/// Marker serialized as `{}` to request TLS with default settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsOptions {}

/// Redis connection options shared by both runtimes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConnectionOptions {
    pub port: u16,
    pub host: String,
    pub db: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsOptions>,
}

impl From<&ConnectionDescriptor> for RedisConnectionOptions {
    fn from(descriptor: &ConnectionDescriptor) -> Self {
        Self {
            port: descriptor.port,
            host: descriptor.host.clone(),
            db: descriptor.database,
            password: descriptor.credential.clone(),
            tls: descriptor.secure_transport.then(TlsOptions::default),
        }
    }
}

impl From<&RedisConnectionOptions> for ConnectionDescriptor {
    fn from(options: &RedisConnectionOptions) -> Self {
        Self {
            host: options.host.clone(),
            port: options.port,
            database: options.db,
            credential: options.password.clone(),
            secure_transport: options.tls.is_some(),
        }
    }
}

/// Runtime A: `new Queue(name, { redis })`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BullQueueOptions {
    pub redis: RedisConnectionOptions,
}

/// Runtime B: `new Queue(name, { connection, prefix })`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BullMqQueueOptions {
    pub connection: RedisConnectionOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}
