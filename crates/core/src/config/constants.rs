// Configuration keys and defaults

pub const KEY_REDIS_URL: &str = "REDIS_URL";
pub const KEY_REDIS_HOST: &str = "REDIS_HOST";
pub const KEY_REDIS_PORT: &str = "REDIS_PORT";
pub const KEY_REDIS_DB: &str = "REDIS_DB";
pub const KEY_REDIS_PASSWORD: &str = "REDIS_PASSWORD";
pub const KEY_REDIS_USE_TLS: &str = "REDIS_USE_TLS";

pub const KEY_BULL_PREFIX: &str = "BULL_PREFIX";
pub const KEY_BULL_VERSION: &str = "BULL_VERSION";

pub const KEY_PORT: &str = "PORT";
pub const KEY_PROXY_PATH: &str = "PROXY_PATH";
pub const KEY_USER_LOGIN: &str = "USER_LOGIN";
pub const KEY_USER_PASSWORD: &str = "USER_PASSWORD";

pub const KEY_DISCOVERY_TIMEOUT_SECS: &str = "DISCOVERY_TIMEOUT_SECS";
pub const KEY_DISCOVERY_INTERVAL_SECS: &str = "DISCOVERY_INTERVAL_SECS";

/// Prefix of the dynamic board option family
pub const BOARD_OPTIONS_PREFIX: &str = "BULL_BOARD_";

pub const DEFAULT_BULL_PREFIX: &str = "bull";
pub const DEFAULT_HTTP_PORT: u16 = 3000;
pub const DEFAULT_DISCOVERY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DISCOVERY_INTERVAL_SECS: u64 = 0;
pub const LOGIN_PATH: &str = "/login";
