// Redis Client Setup

use queueboard_core::domain::ConnectionDescriptor;
use queueboard_core::port::StoreError;
use redis::RedisError;

/// Create a Redis client for `descriptor`. Does not connect.
pub fn create_client(descriptor: &ConnectionDescriptor) -> Result<redis::Client, StoreError> {
    let url = descriptor
        .to_url()
        .map_err(|e| StoreError::Config(e.to_string()))?;

    redis::Client::open(url.as_str()).map_err(|e| StoreError::Config(e.to_string()))
}

// Helper to convert redis::RedisError to StoreError, separating
// reachability problems from rejected commands
pub(crate) fn map_redis_error(err: RedisError) -> StoreError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_io_error() {
        StoreError::Unreachable(err.to_string())
    } else {
        StoreError::Command(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_does_not_connect() {
        let descriptor = ConnectionDescriptor {
            host: "127.0.0.1".to_string(),
            port: 1,
            database: 3,
            credential: Some("secret".to_string()),
            secure_transport: false,
        };

        assert!(create_client(&descriptor).is_ok());
    }

    #[test]
    fn test_create_client_rejects_bad_host() {
        let descriptor = ConnectionDescriptor {
            host: "bad host".to_string(),
            ..ConnectionDescriptor::default()
        };

        assert!(matches!(
            create_client(&descriptor),
            Err(StoreError::Config(_))
        ));
    }
}
