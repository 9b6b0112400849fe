//! Configuration module for Country Pulse
//!
//! Built once at startup and handed to the upstream clients at construction
//! time. Nothing reads the environment after that.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use tracing::info;

use super::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{
    is_placeholder_key, COUNTRIES_BASE_URL, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_UPSTREAM_TIMEOUT_SECS, EXCHANGE_BASE_URL, NEWS_BASE_URL, RANDOM_USER_BASE_URL,
};

/// Base URLs of the four upstream services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamUrls {
    pub random_user: String,
    pub countries: String,
    pub exchange: String,
    pub news: String,
}

impl Default for UpstreamUrls {
    fn default() -> Self {
        Self {
            random_user: RANDOM_USER_BASE_URL.to_string(),
            countries: COUNTRIES_BASE_URL.to_string(),
            exchange: EXCHANGE_BASE_URL.to_string(),
            news: NEWS_BASE_URL.to_string(),
        }
    }
}

impl UpstreamUrls {
    /// Point every upstream at the same host (used by tests with a fake upstream)
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            random_user: base.clone(),
            countries: base.clone(),
            exchange: base.clone(),
            news: base,
        }
    }
}

/// Server + upstream configuration
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Credential for the news index. `None` means "not configured".
    pub news_api_key: Option<String>,
    /// Per-request timeout for upstream calls
    pub upstream_timeout: Duration,
    pub upstreams: UpstreamUrls,
}

impl std::fmt::Debug for Config {
    // Key is NEVER printed
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("news_api_key", &self.news_api_key.as_ref().map(|_| "<hidden>"))
            .field("upstream_timeout", &self.upstream_timeout)
            .field("upstreams", &self.upstreams)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            news_api_key: None,
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            upstreams: UpstreamUrls::default(),
        }
    }
}

impl Config {
    /// Load configuration from process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").filter(|h| !h.trim().is_empty()).unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::new(ErrorCode::ConfigInvalidValue, format!("Invalid PORT: {}", raw))
            })?,
            None => defaults.port,
        };

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    AppError::new(
                        ErrorCode::ConfigInvalidValue,
                        format!("Invalid UPSTREAM_TIMEOUT_SECS: {}", raw),
                    )
                })?;
                Duration::from_secs(secs.max(1))
            }
            None => defaults.upstream_timeout,
        };

        let news_api_key = lookup("NEWS_API_KEY").filter(|k| !is_placeholder_key(k));
        if news_api_key.is_some() {
            info!("🔑 NEWS_API_KEY configured (key hidden for security)");
        }

        let url = |key: &str, fallback: String| {
            lookup(key)
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty())
                .unwrap_or(fallback)
        };
        let upstreams = UpstreamUrls {
            random_user: url("RANDOM_USER_URL", defaults.upstreams.random_user),
            countries: url("COUNTRIES_URL", defaults.upstreams.countries),
            exchange: url("EXCHANGE_URL", defaults.upstreams.exchange),
            news: url("NEWS_URL", defaults.upstreams.news),
        };

        Ok(Self {
            host,
            port,
            news_api_key,
            upstream_timeout,
            upstreams,
        })
    }

    /// Whether the news credential is present
    pub fn news_configured(&self) -> bool {
        self.news_api_key.is_some()
    }

    /// Listen address. HOST may be an IP address or a resolvable name
    /// such as `localhost`; the first resolved address is used.
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let message = format!("Invalid listen address {}:{}", self.host, self.port);
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| AppError::with_source(ErrorCode::ConfigInvalidValue, message.clone(), e))?
            .next()
            .ok_or_else(|| AppError::new(ErrorCode::ConfigInvalidValue, message))
    }
}
