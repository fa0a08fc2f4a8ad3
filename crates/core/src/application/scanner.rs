// Keyspace Scanner - distinct queue names under a namespace prefix

use crate::domain::QueueName;
use crate::error::DiscoveryError;
use crate::port::KeyStore;
use std::collections::BTreeSet;
use tracing::debug;

/// Scan the store for `<prefix>:*` keys and return the sorted, deduplicated queue names.
///
/// # Errors
/// - DiscoveryError::Scan if the store rejects the query or is not connected
pub async fn scan(store: &dyn KeyStore, prefix: &str) -> Result<Vec<QueueName>, DiscoveryError> {
    let pattern = format!("{}:*", prefix);
    let keys = store.keys(&pattern).await.map_err(DiscoveryError::Scan)?;

    debug!(pattern = %pattern, key_count = keys.len(), "Fetched store keys");

    Ok(extract_queue_names(&keys))
}

/// Pure part of the scan: key list => sorted unique queue names
pub fn extract_queue_names<S: AsRef<str>>(keys: &[S]) -> Vec<QueueName> {
    keys.iter()
        .filter_map(|key| QueueName::from_key(key.as_ref()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::key_store::mocks::MockKeyStore;

    fn names(v: &[QueueName]) -> Vec<&str> {
        v.iter().map(QueueName::as_str).collect()
    }

    #[tokio::test]
    async fn test_scan_dedups_and_sorts() {
        let store = MockKeyStore::with_keys([
            "bull:reports:wait",
            "bull:emails:wait",
            "bull:emails:active",
            "other:ignored:wait",
        ]);
        store.connect().await.unwrap();

        let found = scan(&store, "bull").await.unwrap();

        assert_eq!(names(&found), vec!["emails", "reports"]);
        assert_eq!(store.patterns(), vec!["bull:*".to_string()]);
    }

    #[tokio::test]
    async fn test_scan_without_connection_fails() {
        let store = MockKeyStore::with_keys(["bull:emails:wait"]);

        let result = scan(&store, "bull").await;
        assert!(matches!(result, Err(DiscoveryError::Scan(_))));
    }

    #[tokio::test]
    async fn test_scan_empty_keyspace() {
        let store = MockKeyStore::default();
        store.connect().await.unwrap();

        assert!(scan(&store, "bull").await.unwrap().is_empty());
    }

    #[test]
    fn test_extract_skips_malformed_keys() {
        let keys = [
            "bull:emails:wait",
            "bull:emails",
            "bull::wait",
            "bull:emails:1:logs",
            "bull:billing:meta",
        ];

        assert_eq!(names(&extract_queue_names(&keys)), vec!["billing", "emails"]);
    }
}
