// Discovery Orchestrator - connect -> scan -> build -> publish

use crate::application::adapter_factory::AdapterFactory;
use crate::application::scanner;
use crate::domain::{QueueAdapter, QueueName};
use crate::error::DiscoveryError;
use crate::port::{IdProvider, KeyStore, QueueBoard};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Discovery pass states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Idle,
    Connecting,
    Scanning,
    Building,
    Published,
    Failed,
}

impl fmt::Display for DiscoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryState::Idle => write!(f, "IDLE"),
            DiscoveryState::Connecting => write!(f, "CONNECTING"),
            DiscoveryState::Scanning => write!(f, "SCANNING"),
            DiscoveryState::Building => write!(f, "BUILDING"),
            DiscoveryState::Published => write!(f, "PUBLISHED"),
            DiscoveryState::Failed => write!(f, "FAILED"),
        }
    }
}

/// Outcome of one discovery pass
#[derive(Debug)]
pub struct DiscoveryReport {
    pub pass_id: String,
    /// `Published` or `Failed`
    pub state: DiscoveryState,
    /// State the pass was in when it failed
    pub failed_during: Option<DiscoveryState>,
    pub error: Option<DiscoveryError>,
    /// Distinct queue names found by the scan
    pub discovered: Vec<QueueName>,
    /// Queues handed to the board, in publish order
    pub published: Vec<QueueName>,
    /// Queues whose adapter could not be built
    pub skipped: Vec<QueueName>,
}

impl DiscoveryReport {
    pub fn is_published(&self) -> bool {
        self.state == DiscoveryState::Published
    }
}

/// Sequences one discovery pass and publishes the result atomically.
///
/// Failures never escape: they are logged and the previously published
/// queue list stays on the board. Callers must not run two passes at once.
pub struct DiscoveryOrchestrator {
    store: Arc<dyn KeyStore>,
    board: Arc<dyn QueueBoard>,
    factory: AdapterFactory,
    id_provider: Arc<dyn IdProvider>,
    prefix: String,
    timeout: Option<Duration>,
}

impl DiscoveryOrchestrator {
    /// Create a new orchestrator
    ///
    /// # Arguments
    /// * `store` - Shared key store connection
    /// * `board` - Presentation layer receiving the adapter list
    /// * `factory` - Adapter factory bound to the runtime selection
    /// * `id_provider` - Discovery pass IDs for log correlation
    /// * `prefix` - Queue namespace prefix to scan
    pub fn new(
        store: Arc<dyn KeyStore>,
        board: Arc<dyn QueueBoard>,
        factory: AdapterFactory,
        id_provider: Arc<dyn IdProvider>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            board,
            factory,
            id_provider,
            prefix: prefix.into(),
            timeout: None,
        }
    }

    /// Bound connect + scan; expiry fails the pass
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    /// Run one discovery pass
    pub async fn run(&self) -> DiscoveryReport {
        let pass_id = self.id_provider.generate_id();
        let span = info_span!(
            "discovery",
            pass_id = %pass_id,
            prefix = %self.prefix,
            runtime = %self.factory.runtime()
        );

        self.run_pass(pass_id).instrument(span).await
    }

    async fn run_pass(&self, pass_id: String) -> DiscoveryReport {
        let mut state = DiscoveryState::Idle;

        let scanned = match self.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.connect_and_scan(&mut state)).await {
                    Ok(result) => result,
                    Err(_) => Err(DiscoveryError::Timeout(limit)),
                }
            }
            None => self.connect_and_scan(&mut state).await,
        };

        let discovered = match scanned {
            Ok(names) => names,
            Err(e) => {
                error!(
                    error = %e,
                    failed_during = %state,
                    "Queue discovery failed, keeping previously published queues"
                );
                return DiscoveryReport {
                    pass_id,
                    state: DiscoveryState::Failed,
                    failed_during: Some(state),
                    error: Some(e),
                    discovered: Vec::new(),
                    published: Vec::new(),
                    skipped: Vec::new(),
                };
            }
        };

        transition(&mut state, DiscoveryState::Building);
        let (adapters, skipped) = self.build_adapters(&discovered);
        let published: Vec<QueueName> = adapters.iter().map(|a| a.name().clone()).collect();

        self.board.replace_queues(adapters);
        transition(&mut state, DiscoveryState::Published);

        info!(
            discovered = discovered.len(),
            published = published.len(),
            skipped = skipped.len(),
            "Setup queues done"
        );

        DiscoveryReport {
            pass_id,
            state,
            failed_during: None,
            error: None,
            discovered,
            published,
            skipped,
        }
    }

    async fn connect_and_scan(
        &self,
        state: &mut DiscoveryState,
    ) -> Result<Vec<QueueName>, DiscoveryError> {
        transition(state, DiscoveryState::Connecting);
        if self.store.is_open() {
            debug!("Store connection already open");
        } else {
            info!("Connecting to store");
            self.store.connect().await.map_err(DiscoveryError::Connect)?;
            info!("Connected to store");
        }

        transition(state, DiscoveryState::Scanning);
        info!("Fetching store keys");
        scanner::scan(self.store.as_ref(), &self.prefix).await
    }

    /// Best-effort: a queue whose adapter fails is logged and left out
    fn build_adapters(&self, names: &[QueueName]) -> (Vec<QueueAdapter>, Vec<QueueName>) {
        let mut adapters = Vec::with_capacity(names.len());
        let mut skipped = Vec::new();

        for name in names {
            match self.factory.create(name) {
                Ok(adapter) => adapters.push(adapter),
                Err(e) => {
                    warn!(queue = %name, error = %e, "Skipping queue, adapter construction failed");
                    skipped.push(name.clone());
                }
            }
        }

        (adapters, skipped)
    }
}

fn transition(state: &mut DiscoveryState, next: DiscoveryState) {
    debug!(from = %state, to = %next, "Discovery state transition");
    *state = next;
}
