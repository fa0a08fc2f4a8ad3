// Queue Connector Port - the two runtime client bindings
use crate::domain::{
    AdapterConstructionError, BullMqQueueOptions, BullQueueOptions, QueueHandle, QueueName,
};
use std::sync::Arc;

/// Builds queue handles for both runtime generations.
///
/// Construction must not block on I/O: a handle that cannot reach the store
/// reports that on its first read, not here.
pub trait QueueConnector: Send + Sync {
    /// Runtime A (legacy Bull) handle
    fn open_bull(
        &self,
        name: &QueueName,
        options: &BullQueueOptions,
    ) -> Result<Arc<dyn QueueHandle>, AdapterConstructionError>;

    /// Runtime B (BullMQ) handle
    fn open_bullmq(
        &self,
        name: &QueueName,
        options: &BullMqQueueOptions,
    ) -> Result<Arc<dyn QueueHandle>, AdapterConstructionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::{JobCounts, JobStatus, JobSummary, QueueReadError};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Options a mock connector was asked to build with
    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOpen {
        Bull(QueueName, BullQueueOptions),
        BullMq(QueueName, BullMqQueueOptions),
    }

    /// Handle returning fixed counts and no jobs
    pub struct MockQueueHandle {
        pub counts: JobCounts,
        pub paused: bool,
    }

    #[async_trait]
    impl QueueHandle for MockQueueHandle {
        async fn is_paused(&self) -> Result<bool, QueueReadError> {
            Ok(self.paused)
        }

        async fn job_counts(&self) -> Result<JobCounts, QueueReadError> {
            Ok(self.counts.clone())
        }

        async fn list_jobs(
            &self,
            _status: JobStatus,
            _start: usize,
            _end: usize,
        ) -> Result<Vec<JobSummary>, QueueReadError> {
            Ok(Vec::new())
        }
    }

    /// Connector recording every open, failing for selected queue names
    #[derive(Default)]
    pub struct MockQueueConnector {
        failing: Mutex<HashSet<String>>,
        opened: Mutex<Vec<RecordedOpen>>,
    }

    impl MockQueueConnector {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_for(&self, name: &str) {
            self.failing.lock().unwrap().insert(name.to_string());
        }

        pub fn opened(&self) -> Vec<RecordedOpen> {
            self.opened.lock().unwrap().clone()
        }

        fn check(&self, name: &QueueName) -> Result<(), AdapterConstructionError> {
            if self.failing.lock().unwrap().contains(name.as_str()) {
                return Err(AdapterConstructionError::Client {
                    queue: name.to_string(),
                    reason: "scripted failure".to_string(),
                });
            }
            Ok(())
        }

        fn handle() -> Arc<dyn QueueHandle> {
            let mut counts = JobCounts::default();
            counts.set(JobStatus::Waiting, 1);
            Arc::new(MockQueueHandle {
                counts,
                paused: false,
            })
        }
    }

    impl QueueConnector for MockQueueConnector {
        fn open_bull(
            &self,
            name: &QueueName,
            options: &BullQueueOptions,
        ) -> Result<Arc<dyn QueueHandle>, AdapterConstructionError> {
            self.check(name)?;
            self.opened
                .lock()
                .unwrap()
                .push(RecordedOpen::Bull(name.clone(), options.clone()));
            Ok(Self::handle())
        }

        fn open_bullmq(
            &self,
            name: &QueueName,
            options: &BullMqQueueOptions,
        ) -> Result<Arc<dyn QueueHandle>, AdapterConstructionError> {
            self.check(name)?;
            self.opened
                .lock()
                .unwrap()
                .push(RecordedOpen::BullMq(name.clone(), options.clone()));
            Ok(Self::handle())
        }
    }
}
