// Re-discovery Scheduler - periodic discovery passes in the background

use crate::application::discovery::DiscoveryOrchestrator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

/// Stop request for the scheduler loop
#[derive(Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once stop was requested (or the handle was dropped)
    pub async fn stopped(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

/// Shortest accepted re-discovery period
pub const MIN_PERIOD: Duration = Duration::from_secs(1);

/// Runs a discovery pass every `period` until stopped.
///
/// Passes are sequential: a slow pass delays the next tick instead of
/// overlapping it.
pub struct RediscoveryScheduler {
    orchestrator: Arc<DiscoveryOrchestrator>,
    period: Duration,
}

impl RediscoveryScheduler {
    /// Periods below [`MIN_PERIOD`] (including zero) are raised to it.
    pub fn new(orchestrator: Arc<DiscoveryOrchestrator>, period: Duration) -> Self {
        if period < MIN_PERIOD {
            warn!(
                period_ms = period.as_millis() as u64,
                "Re-discovery period too short, using 1s"
            );
        }
        Self {
            orchestrator,
            period: period.max(MIN_PERIOD),
        }
    }

    /// Should be spawned in tokio::spawn. Returns the number of passes run.
    pub async fn run(self, mut stop: StopSignal) -> u64 {
        info!(period_secs = self.period.as_secs(), "Re-discovery scheduler started");

        let mut tick = interval(self.period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately; startup discovery already ran
        tick.tick().await;

        let mut passes = 0;
        loop {
            tokio::select! {
                _ = stop.stopped() => break,
                _ = tick.tick() => {}
            }

            let report = self.orchestrator.run().await;
            passes += 1;
            if !report.is_published() {
                warn!(pass_id = %report.pass_id, "Re-discovery failed, will retry next tick");
            }
        }

        info!(passes, "Re-discovery scheduler stopped");
        passes
    }
}
