// Queue Board Infrastructure - Redis Adapter
// Implements: KeyStore, QueueConnector (Bull + BullMQ inspectors)

mod bull;
mod bullmq;
mod connection;
mod connector;
mod key_store;
mod reader;

pub use bull::BullQueue;
pub use bullmq::BullMqQueue;
pub use connection::create_client;
pub use connector::RedisQueueConnector;
pub use key_store::RedisKeyStore;
