// Connection Resolver - one canonical store connection descriptor

use crate::domain::error::ConfigParseError;
use std::fmt;
use tracing::warn;
use url::Url;

pub const DEFAULT_REDIS_HOST: &str = "localhost";
pub const DEFAULT_REDIS_PORT: u16 = 6379;
pub const DEFAULT_REDIS_DB: u32 = 0;

const PLAIN_SCHEME: &str = "redis";
const SECURE_SCHEME: &str = "rediss";

/// Canonical store connection settings.
///
/// Built once at startup by [`resolve`] and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub port: u16,
    pub database: u32,
    pub credential: Option<String>,
    pub secure_transport: bool,
}

impl Default for ConnectionDescriptor {
    fn default() -> Self {
        Self {
            host: DEFAULT_REDIS_HOST.to_string(),
            port: DEFAULT_REDIS_PORT,
            database: DEFAULT_REDIS_DB,
            credential: None,
            secure_transport: false,
        }
    }
}

impl ConnectionDescriptor {
    /// Render as `redis[s]://[:password@]host:port/db`.
    pub fn to_url(&self) -> Result<Url, ConfigParseError> {
        let scheme = if self.secure_transport {
            SECURE_SCHEME
        } else {
            PLAIN_SCHEME
        };
        let mut url = Url::parse(&format!(
            "{}://{}:{}/{}",
            scheme, self.host, self.port, self.database
        ))?;

        if let Some(password) = self.credential.as_deref() {
            url.set_password(Some(password))
                .map_err(|_| ConfigParseError::MissingHost(self.host.clone()))?;
        }

        Ok(url)
    }
}

// Credential is never printed
impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.secure_transport {
            SECURE_SCHEME
        } else {
            PLAIN_SCHEME
        };
        let auth = if self.credential.is_some() { ":***@" } else { "" };
        write!(
            f,
            "{}://{}{}:{}/{}",
            scheme, auth, self.host, self.port, self.database
        )
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("credential", &self.credential.as_ref().map(|_| "***"))
            .field("secure_transport", &self.secure_transport)
            .finish()
    }
}

/// Raw discrete connection fields, exactly as they appear in the environment.
#[derive(Debug, Clone, Default)]
pub struct DiscreteConnectionFields {
    pub host: Option<String>,
    pub port: Option<String>,
    pub db: Option<String>,
    pub password: Option<String>,
    pub tls: Option<String>,
}

/// Fields a valid connection URL managed to supply. `None` means "not in the URL".
#[derive(Debug, Default, PartialEq, Eq)]
struct UrlFields {
    host: Option<String>,
    port: Option<u16>,
    database: Option<u32>,
    credential: Option<String>,
    secure_transport: bool,
}

/// Resolve the connection descriptor.
///
/// URL fields win over discrete fields, which win over the hard defaults.
/// A malformed URL is logged and ignored; this function never fails.
pub fn resolve(url: Option<&str>, fields: &DiscreteConnectionFields) -> ConnectionDescriptor {
    let from_url = match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(raw) => match parse_url(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Invalid REDIS_URL provided, using discrete connection fields");
                UrlFields::default()
            }
        },
        None => UrlFields::default(),
    };

    let host = from_url
        .host
        .or_else(|| non_empty(fields.host.as_deref()).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_REDIS_HOST.to_string());

    let port = from_url
        .port
        .or_else(|| non_empty(fields.port.as_deref()).and_then(parse_port))
        .unwrap_or(DEFAULT_REDIS_PORT);

    let database = from_url
        .database
        .or_else(|| non_empty(fields.db.as_deref()).and_then(|s| s.trim().parse().ok()))
        .unwrap_or(DEFAULT_REDIS_DB);

    let credential = from_url
        .credential
        .or_else(|| non_empty(fields.password.as_deref()).map(str::to_string));

    let secure_transport = from_url.secure_transport
        || non_empty(fields.tls.as_deref())
            .map(|s| s.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

    ConnectionDescriptor {
        host,
        port,
        database,
        credential,
        secure_transport,
    }
}

fn parse_url(raw: &str) -> Result<UrlFields, ConfigParseError> {
    let parsed = Url::parse(raw)?;

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_string);

    let credential = parsed.password().filter(|p| !p.is_empty()).map(|p| {
        urlencoding::decode(p)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| p.to_string())
    });

    let database = parsed
        .path()
        .strip_prefix('/')
        .filter(|p| !p.is_empty())
        .and_then(|p| p.parse::<u32>().ok());

    Ok(UrlFields {
        host,
        port: parsed.port().filter(|p| *p > 0),
        database,
        credential,
        secure_transport: parsed.scheme() == SECURE_SCHEME,
    })
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|p| *p > 0)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
