// Application Layer - Discovery use cases

pub mod adapter_factory;
pub mod discovery;
pub mod rediscovery;
pub mod registry;
pub mod scanner;

// Re-exports
pub use adapter_factory::AdapterFactory;
pub use discovery::{DiscoveryOrchestrator, DiscoveryReport, DiscoveryState};
pub use rediscovery::{stop_channel, RediscoveryScheduler, StopHandle, StopSignal};
pub use registry::BoardRegistry;
