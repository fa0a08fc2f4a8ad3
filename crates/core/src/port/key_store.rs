// Key Store Port - connect and keyspace queries
use async_trait::async_trait;
use thiserror::Error;

/// Key-value store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid store configuration: {0}")]
    Config(String),

    #[error("Store unreachable: {0}")]
    Unreachable(String),

    #[error("Store connection not open")]
    NotConnected,

    #[error("Store command failed: {0}")]
    Command(String),
}

/// Key store port used by the keyspace scanner
///
/// Implementations:
/// - RedisKeyStore: shared long-lived Redis connection
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Whether `connect` already succeeded
    fn is_open(&self) -> bool;

    /// Open the connection. Calling this on an open store is a no-op.
    async fn connect(&self) -> Result<(), StoreError>;

    /// All keys matching a glob `pattern` (`KEYS` semantics)
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory key store with scripted failures
    #[derive(Default)]
    pub struct MockKeyStore {
        keys: Mutex<Vec<String>>,
        open: AtomicBool,
        fail_connect: AtomicBool,
        fail_keys: AtomicBool,
        connect_delay: Mutex<Option<Duration>>,
        connect_calls: AtomicUsize,
        patterns: Mutex<Vec<String>>,
    }

    impl MockKeyStore {
        pub fn with_keys<I, S>(keys: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            let store = Self::default();
            store.set_keys(keys);
            store
        }

        pub fn unreachable() -> Self {
            let store = Self::default();
            store.fail_connect.store(true, Ordering::SeqCst);
            store
        }

        pub fn set_keys<I, S>(&self, keys: I)
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            *self.keys.lock().unwrap() = keys.into_iter().map(Into::into).collect();
        }

        pub fn set_fail_connect(&self, fail: bool) {
            self.fail_connect.store(fail, Ordering::SeqCst);
            if fail {
                self.open.store(false, Ordering::SeqCst);
            }
        }

        pub fn set_fail_keys(&self, fail: bool) {
            self.fail_keys.store(fail, Ordering::SeqCst);
        }

        pub fn set_connect_delay(&self, delay: Duration) {
            *self.connect_delay.lock().unwrap() = Some(delay);
        }

        /// How many times `connect` actually opened a connection
        pub fn connect_calls(&self) -> usize {
            self.connect_calls.load(Ordering::SeqCst)
        }

        /// Patterns passed to `keys`, in call order
        pub fn patterns(&self) -> Vec<String> {
            self.patterns.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl KeyStore for MockKeyStore {
        fn is_open(&self) -> bool {
            self.open.load(Ordering::SeqCst)
        }

        async fn connect(&self) -> Result<(), StoreError> {
            if self.is_open() {
                return Ok(());
            }

            let delay = *self.connect_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            if self.fail_connect.load(Ordering::SeqCst) {
                return Err(StoreError::Unreachable("connection refused".to_string()));
            }

            self.connect_calls.fetch_add(1, Ordering::SeqCst);
            self.open.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
            if !self.is_open() {
                return Err(StoreError::NotConnected);
            }
            self.patterns.lock().unwrap().push(pattern.to_string());

            if self.fail_keys.load(Ordering::SeqCst) {
                return Err(StoreError::Command("KEYS failed".to_string()));
            }

            // Only trailing-`*` patterns are needed by the scanner
            let prefix = pattern.trim_end_matches('*');
            Ok(self
                .keys
                .lock()
                .unwrap()
                .iter()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }
    }
}
