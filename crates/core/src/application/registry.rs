// Board Registry - in-process holder of the published queue list

use crate::domain::QueueAdapter;
use crate::port::QueueBoard;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Latest published adapter list.
///
/// Each publish swaps the whole list, so readers see either the previous
/// pass or the new one, never a mix.
pub struct BoardRegistry {
    tx: watch::Sender<Arc<Vec<QueueAdapter>>>,
    publishes: AtomicU64,
}

impl BoardRegistry {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Vec::new()));
        Self {
            tx,
            publishes: AtomicU64::new(0),
        }
    }

    /// Current queue list
    pub fn snapshot(&self) -> Arc<Vec<QueueAdapter>> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every publish (for the presentation layer)
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<QueueAdapter>>> {
        self.tx.subscribe()
    }

    pub fn queue_names(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .map(|adapter| adapter.name().to_string())
            .collect()
    }

    /// Number of completed publishes
    pub fn publish_count(&self) -> u64 {
        self.publishes.load(Ordering::SeqCst)
    }
}

impl Default for BoardRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueBoard for BoardRegistry {
    fn replace_queues(&self, queues: Vec<QueueAdapter>) {
        self.tx.send_replace(Arc::new(queues));
        self.publishes.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionDescriptor, QueueName, RuntimeVersion};
    use crate::port::queue_connector::mocks::MockQueueConnector;

    fn adapters(names: &[&str]) -> Vec<QueueAdapter> {
        let connector = MockQueueConnector::new();
        names
            .iter()
            .map(|n| {
                crate::application::adapter_factory::build(
                    &connector,
                    &QueueName::new(*n),
                    &ConnectionDescriptor::default(),
                    RuntimeVersion::Bull,
                    None,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_replace_swaps_whole_list() {
        let registry = BoardRegistry::new();
        registry.replace_queues(adapters(&["a", "b"]));
        let before = registry.snapshot();

        registry.replace_queues(adapters(&["c"]));

        assert_eq!(before.len(), 2);
        assert_eq!(registry.queue_names(), vec!["c"]);
        assert_eq!(registry.publish_count(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_publish() {
        let registry = BoardRegistry::new();
        let mut rx = registry.subscribe();

        registry.replace_queues(adapters(&["emails"]));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
