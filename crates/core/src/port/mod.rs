// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod key_store;
pub mod queue_board;
pub mod queue_connector;

// Re-exports
pub use id_provider::IdProvider;
pub use key_store::{KeyStore, StoreError};
pub use queue_board::QueueBoard;
pub use queue_connector::QueueConnector;
