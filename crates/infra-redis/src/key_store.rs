// Redis KeyStore Implementation

use crate::connection::{create_client, map_redis_error};
use async_trait::async_trait;
use queueboard_core::domain::ConnectionDescriptor;
use queueboard_core::port::{KeyStore, StoreError};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::fmt;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Shared long-lived store connection, opened once on first `connect`
pub struct RedisKeyStore {
    client: redis::Client,
    descriptor: ConnectionDescriptor,
    conn: OnceCell<ConnectionManager>,
}

impl RedisKeyStore {
    pub fn new(descriptor: &ConnectionDescriptor) -> Result<Self, StoreError> {
        Ok(Self {
            client: create_client(descriptor)?,
            descriptor: descriptor.clone(),
            conn: OnceCell::new(),
        })
    }

    fn connection(&self) -> Result<ConnectionManager, StoreError> {
        self.conn.get().cloned().ok_or(StoreError::NotConnected)
    }
}

impl fmt::Debug for RedisKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisKeyStore")
            .field("target", &self.descriptor.to_string())
            .field("open", &self.conn.initialized())
            .finish()
    }
}

#[async_trait]
impl KeyStore for RedisKeyStore {
    fn is_open(&self) -> bool {
        self.conn.initialized()
    }

    async fn connect(&self) -> Result<(), StoreError> {
        self.conn
            .get_or_try_init(|| async {
                info!(target_url = %self.descriptor, "Opening Redis connection");
                ConnectionManager::new(self.client.clone())
                    .await
                    .map_err(map_redis_error)
            })
            .await?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection()?;

        let keys: Vec<String> = conn.keys(pattern).await.map_err(map_redis_error)?;
        debug!(pattern = %pattern, count = keys.len(), "Redis KEYS");

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keys_before_connect_fails() {
        let store = RedisKeyStore::new(&ConnectionDescriptor::default()).unwrap();

        assert!(!store.is_open());
        assert!(matches!(
            store.keys("bull:*").await,
            Err(StoreError::NotConnected)
        ));
    }

    #[test]
    fn test_debug_hides_credential() {
        let descriptor = ConnectionDescriptor {
            credential: Some("secret".to_string()),
            ..ConnectionDescriptor::default()
        };
        let store = RedisKeyStore::new(&descriptor).unwrap();

        assert!(!format!("{:?}", store).contains("secret"));
    }

    /// Requires a running Redis at REDIS_URL (default redis://127.0.0.1:6379)
    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_connect_and_scan_live() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let descriptor =
            queueboard_core::domain::connection::resolve(Some(url.as_str()), &Default::default());
        let store = RedisKeyStore::new(&descriptor).unwrap();

        store.connect().await.unwrap();
        store.connect().await.unwrap();
        assert!(store.is_open());

        let mut conn = store.connection().unwrap();
        let _: () = conn.set("queueboard-test:live:wait", "x").await.unwrap();

        let keys = store.keys("queueboard-test:*").await.unwrap();
        assert!(keys.contains(&"queueboard-test:live:wait".to_string()));

        let _: () = conn.del("queueboard-test:live:wait").await.unwrap();
    }
}
