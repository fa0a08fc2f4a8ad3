// Application Configuration - built once at startup, immutable afterwards

pub mod constants;

use crate::domain::connection::{self, ConnectionDescriptor, DiscreteConnectionFields};
use crate::domain::options::{self, OptionsTree};
use crate::domain::RuntimeVersion;
use constants::*;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Resolved dashboard configuration.
///
/// Constructed by [`AppConfig::from_pairs`] or [`AppConfig::from_env`] and
/// shared by `Arc` with every component that needs it.
#[derive(Clone)]
pub struct AppConfig {
    pub redis: ConnectionDescriptor,
    pub bull_prefix: String,
    pub bull_version: RuntimeVersion,
    /// Port the external dashboard server listens on
    pub port: u16,
    /// Base path without trailing slash, empty when served at the root
    pub proxy_path: String,
    pub user_login: Option<String>,
    pub user_password: Option<String>,
    pub auth_enabled: bool,
    pub home_page: String,
    pub login_page: String,
    /// Dynamic `BULL_BOARD_*` options for the board renderer
    pub board_options: OptionsTree,
    pub discovery_timeout: Option<Duration>,
    pub discovery_interval: Option<Duration>,
}

impl AppConfig {
    /// Build from environment-style pairs. Later duplicates of a key win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let lookup: HashMap<&str, &str> = entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let get = |key: &str| -> Option<String> {
            lookup
                .get(key)
                .map(|v| v.to_string())
                .filter(|v| !v.is_empty())
        };

        let discrete = DiscreteConnectionFields {
            host: get(KEY_REDIS_HOST),
            port: get(KEY_REDIS_PORT),
            db: get(KEY_REDIS_DB),
            password: get(KEY_REDIS_PASSWORD),
            tls: get(KEY_REDIS_USE_TLS),
        };
        let redis = connection::resolve(get(KEY_REDIS_URL).as_deref(), &discrete);

        let bull_version = match get(KEY_BULL_VERSION) {
            None => RuntimeVersion::default(),
            Some(raw) => RuntimeVersion::from_selector(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Unrecognised BULL_VERSION, using the legacy Bull runtime");
                RuntimeVersion::Bull
            }),
        };

        let proxy_path = normalize_path(get(KEY_PROXY_PATH).as_deref());
        let user_login = get(KEY_USER_LOGIN);
        let user_password = get(KEY_USER_PASSWORD);
        let auth_enabled = user_login.is_some() && user_password.is_some();
        let home_page = if proxy_path.is_empty() {
            "/".to_string()
        } else {
            proxy_path.clone()
        };
        let login_page = format!("{}{}", proxy_path, LOGIN_PATH);

        Self {
            redis,
            bull_prefix: get(KEY_BULL_PREFIX).unwrap_or_else(|| DEFAULT_BULL_PREFIX.to_string()),
            bull_version,
            port: parse_or(KEY_PORT, get(KEY_PORT), DEFAULT_HTTP_PORT),
            proxy_path,
            user_login,
            user_password,
            auth_enabled,
            home_page,
            login_page,
            board_options: options::parse(
                BOARD_OPTIONS_PREFIX,
                entries.iter().map(|(k, v)| (k, v)),
            ),
            discovery_timeout: seconds(
                KEY_DISCOVERY_TIMEOUT_SECS,
                get(KEY_DISCOVERY_TIMEOUT_SECS),
                DEFAULT_DISCOVERY_TIMEOUT_SECS,
            ),
            discovery_interval: seconds(
                KEY_DISCOVERY_INTERVAL_SECS,
                get(KEY_DISCOVERY_INTERVAL_SECS),
                DEFAULT_DISCOVERY_INTERVAL_SECS,
            ),
        }
    }

    /// Build from the process environment.
    ///
    /// Variables are read in key order so the option tree does not depend on
    /// the platform's environment ordering.
    /// Variables that are not valid UTF-8 are skipped with a warning.
    pub fn from_env() -> Self {
        let mut vars: Vec<(String, String)> = std::env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (Ok(key), Err(_)) => {
                    warn!(key = %key, "Skipping environment variable with a non UTF-8 value");
                    None
                }
                (Err(key), _) => {
                    warn!(key = %key.to_string_lossy(), "Skipping non UTF-8 environment variable");
                    None
                }
            })
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        Self::from_pairs(vars)
    }

    /// Prefix handed to runtime B; `None` when not configured
    pub fn queue_prefix(&self) -> Option<String> {
        Some(self.bull_prefix.clone()).filter(|p| !p.is_empty())
    }

    /// Board options as plain JSON
    pub fn board_options_json(&self) -> serde_json::Value {
        self.board_options.to_json()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("redis", &self.redis)
            .field("bull_prefix", &self.bull_prefix)
            .field("bull_version", &self.bull_version)
            .field("port", &self.port)
            .field("proxy_path", &self.proxy_path)
            .field("user_login", &self.user_login)
            .field("user_password", &self.user_password.as_ref().map(|_| "***"))
            .field("auth_enabled", &self.auth_enabled)
            .field("home_page", &self.home_page)
            .field("login_page", &self.login_page)
            .field("board_options", &self.board_options)
            .field("discovery_timeout", &self.discovery_timeout)
            .field("discovery_interval", &self.discovery_interval)
            .finish()
    }
}

/// Strip one trailing slash: `/admin/` => `/admin`, `/` => ``
fn normalize_path(path: Option<&str>) -> String {
    let path = path.unwrap_or("");
    path.strip_suffix('/').unwrap_or(path).to_string()
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Invalid numeric setting, using default");
            default
        }),
    }
}

/// Seconds setting where `0` disables the feature
fn seconds(key: &str, raw: Option<String>, default: u64) -> Option<Duration> {
    let secs = parse_or(key, raw, default);
    (secs > 0).then(|| Duration::from_secs(secs))
}
