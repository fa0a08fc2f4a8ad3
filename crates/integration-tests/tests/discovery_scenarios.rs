//! Discovery scenarios over in-memory store and connector doubles

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use queueboard_core::application::{
    stop_channel, AdapterFactory, BoardRegistry, DiscoveryOrchestrator, DiscoveryState,
    RediscoveryScheduler,
};
use queueboard_core::domain::{JobStatus, QueueName, RuntimeVersion};
use queueboard_core::port::id_provider::mocks::SequentialIdProvider;
use queueboard_core::port::key_store::mocks::MockKeyStore;
use queueboard_core::port::queue_connector::mocks::{MockQueueConnector, RecordedOpen};
use queueboard_core::AppConfig;
use serde_json::json;
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// Counts ERROR events
#[derive(Clone, Default)]
struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

struct Board {
    store: Arc<MockKeyStore>,
    connector: Arc<MockQueueConnector>,
    registry: Arc<BoardRegistry>,
    orchestrator: Arc<DiscoveryOrchestrator>,
}

fn board_from_env(pairs: &[(&str, &str)], store: MockKeyStore) -> Board {
    let config = AppConfig::from_pairs(pairs.iter().copied());
    let store = Arc::new(store);
    let connector = Arc::new(MockQueueConnector::new());
    let registry = Arc::new(BoardRegistry::new());

    let factory = AdapterFactory::new(
        connector.clone(),
        config.redis.clone(),
        config.bull_version,
        config.queue_prefix(),
    );
    let orchestrator = Arc::new(
        DiscoveryOrchestrator::new(
            store.clone(),
            registry.clone(),
            factory,
            Arc::new(SequentialIdProvider::default()),
            config.bull_prefix.clone(),
        )
        .with_timeout(config.discovery_timeout),
    );

    Board {
        store,
        connector,
        registry,
        orchestrator,
    }
}

#[tokio::test]
async fn test_bullmq_queues_published_with_prefix() {
    let board = board_from_env(
        &[
            ("REDIS_URL", "redis://:secret@cache.local:6380/2"),
            ("BULL_VERSION", "BULLMQ"),
            ("BULL_PREFIX", "jobs"),
        ],
        MockKeyStore::with_keys(["jobs:emails:wait", "jobs:emails:1", "jobs:reports:meta"]),
    );

    let report = board.orchestrator.run().await;

    assert!(report.is_published());
    assert_eq!(board.store.patterns(), vec!["jobs:*"]);
    assert_eq!(board.registry.queue_names(), vec!["emails", "reports"]);

    let opened = board.connector.opened();
    let RecordedOpen::BullMq(name, options) = &opened[0] else {
        panic!("expected a BullMQ handle, got {:?}", opened);
    };
    assert_eq!(name, &QueueName::new("emails"));
    assert_eq!(
        serde_json::to_value(options).unwrap(),
        json!({
            "connection": {
                "port": 6380,
                "host": "cache.local",
                "db": 2,
                "password": "secret"
            },
            "prefix": "jobs"
        })
    );
}

#[tokio::test]
async fn test_legacy_runtime_ignores_prefix() {
    let board = board_from_env(
        &[("BULL_VERSION", "BULL"), ("BULL_PREFIX", "bull")],
        MockKeyStore::with_keys(["bull:reports:wait"]),
    );

    board.orchestrator.run().await;

    let snapshot = board.registry.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].runtime(), RuntimeVersion::Bull);
    assert_eq!(snapshot[0].prefix(), "bull");

    let RecordedOpen::Bull(_, options) = &board.connector.opened()[0] else {
        panic!("expected a Bull handle");
    };
    assert!(serde_json::to_value(options).unwrap().get("prefix").is_none());
}

#[tokio::test]
async fn test_published_adapters_are_readable() {
    let board = board_from_env(&[], MockKeyStore::with_keys(["bull:emails:wait"]));
    board.orchestrator.run().await;

    let snapshot = board.registry.snapshot();
    let adapter = &snapshot[0];
    let metadata = adapter.metadata().await.unwrap();
    let counts = adapter.job_counts().await.unwrap();

    assert_eq!(metadata.name.as_str(), "emails");
    assert!(!metadata.paused);
    assert_eq!(counts.get(JobStatus::Waiting), 1);
    assert!(adapter.list_jobs(JobStatus::Failed, 0, 9).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_store_logs_one_failure_and_keeps_board() {
    let counter = ErrorCounter::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()));

    let board = board_from_env(&[], MockKeyStore::with_keys(["bull:emails:wait"]));
    assert!(board.orchestrator.run().await.is_published());
    assert_eq!(counter.count(), 0);

    board.store.set_fail_connect(true);
    let report = board.orchestrator.run().await;

    assert_eq!(report.state, DiscoveryState::Failed);
    assert_eq!(counter.count(), 1);
    assert_eq!(board.registry.queue_names(), vec!["emails"]);
}

#[tokio::test]
async fn test_never_reachable_store_leaves_board_empty() {
    let board = board_from_env(&[], MockKeyStore::unreachable());

    let report = board.orchestrator.run().await;

    assert_eq!(report.failed_during, Some(DiscoveryState::Connecting));
    assert!(board.registry.snapshot().is_empty());
    assert_eq!(board.registry.publish_count(), 0);
}

#[tokio::test]
async fn test_subscribers_see_each_publish() {
    let board = board_from_env(&[], MockKeyStore::with_keys(["bull:emails:wait"]));
    let mut updates = board.registry.subscribe();

    board.orchestrator.run().await;
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().len(), 1);

    board
        .store
        .set_keys(["bull:emails:wait", "bull:invoices:delayed"]);
    board.orchestrator.run().await;
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_rediscovery_picks_up_new_queues() {
    let board = board_from_env(
        &[("DISCOVERY_INTERVAL_SECS", "30")],
        MockKeyStore::with_keys(["bull:emails:wait"]),
    );
    board.orchestrator.run().await;
    assert_eq!(board.registry.queue_names(), vec!["emails"]);

    let (stop, signal) = stop_channel();
    let scheduler = RediscoveryScheduler::new(board.orchestrator.clone(), Duration::from_secs(30));
    let task = tokio::spawn(scheduler.run(signal));

    board.store.set_keys(["bull:emails:wait", "bull:audit:wait"]);
    tokio::time::sleep(Duration::from_secs(31)).await;

    assert_eq!(board.registry.queue_names(), vec!["audit", "emails"]);

    stop.stop();
    assert_eq!(task.await.unwrap(), 1);
}
