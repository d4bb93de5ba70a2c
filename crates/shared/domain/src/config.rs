use crate::constants::{DEFAULT_API_URL, DEFAULT_SITE_URL};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub security: SecurityConfig,
    pub contact: ContactConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Public site identity and the directory holding the built pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical origin, without a trailing slash (e.g. `https://averon.agency`).
    pub base_url: String,
    /// Optional directory served as fallback for every unmatched route.
    pub static_dir: Option<PathBuf>,
}

/// Middleware knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub rate_limit: RateLimitConfig,
    /// Requests declaring a larger `Content-Length` are rejected with 413.
    pub max_body_bytes: u64,
    /// Relaxes the CSP `connect-src` for local tooling (localhost, websockets).
    pub development: bool,
    /// Origin allowed in `connect-src`/`form-action`. Derived from `client.api_url` when unset.
    pub api_origin: Option<String>,
}

/// Fixed-window limits, per client IP.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

/// Contact backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Bearer token for the admin endpoints. Admin routes answer 403 while unset.
    pub admin_token: Option<String>,
    pub notify: NotifyConfig,
    /// Spam screening (disposable domains, blocked words, symbol runs).
    pub screening: bool,
    /// Per-IP budget for `POST /contacts/`, on top of the global limiter.
    pub submit_limit: RateLimitConfig,
}

/// Where new submissions get announced.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotifyConfig {
    Disabled,
    #[default]
    Log,
    Smtp(SmtpConfig),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

/// Contact API client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Extra directives, e.g. `agency_contact=debug,tower_http=info`.
    pub filter: Option<String>,
    pub path: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 8000, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_SITE_URL.to_owned(), static_dir: None }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            max_body_bytes: 1024 * 1024,
            development: false,
            api_origin: None,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { max_requests: 10, window_secs: 60 }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            admin_token: None,
            notify: NotifyConfig::default(),
            screening: true,
            submit_limit: RateLimitConfig { max_requests: 3, window_secs: 60 * 60 },
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: "noreply@localhost".to_owned(),
            to: "contact@localhost".to_owned(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), filter: None, path: None, json: false }
    }
}
