//! Proxy configuration
//!
//! `ProxyConfig` collects the listen address, cache limits, upstream timeouts
//! and error-reporting policy. It can be built in code with the `with_*`
//! methods or loaded from a JSON file; every field has a default.

pub mod validation;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;
pub use validation::{ConfigDefaults, ConfigResult, ConfigValidator, ConfigurationError, Validator};

/// What the client sees when the origin server cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreachablePolicy {
    /// Close the client connection without a response
    #[default]
    Silent,
    /// Answer with `502 Bad Gateway` before closing
    BadGateway,
}

/// Proxy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Address to bind the listening socket to
    pub bind: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Object cache limits
    pub cache: CacheConfig,
    /// User-Agent sent to origin servers in place of the client's
    pub user_agent: String,
    /// Upstream connect timeout in milliseconds; 0 disables it
    pub connect_timeout_ms: u64,
    /// Upstream per-line idle timeout in milliseconds; 0 disables it
    pub idle_timeout_ms: u64,
    /// Response policy for unreachable origin servers
    pub unreachable_policy: UnreachablePolicy,
    /// Longest line read in one piece from either side
    pub max_line_len: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: ConfigDefaults::DEFAULT_PORT,
            cache: CacheConfig::default(),
            user_agent: ConfigDefaults::DEFAULT_USER_AGENT.to_string(),
            connect_timeout_ms: millis(ConfigDefaults::DEFAULT_CONNECT_TIMEOUT),
            idle_timeout_ms: millis(ConfigDefaults::DEFAULT_IDLE_TIMEOUT),
            unreachable_policy: UnreachablePolicy::Silent,
            max_line_len: ConfigDefaults::DEFAULT_MAX_LINE_LEN,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn optional(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl ProxyConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Io` if the file cannot be read,
    /// `ConfigurationError::Parse` if it is not valid JSON for this structure,
    /// or any validation error from [`Validator::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the listening port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the listening address
    #[must_use]
    pub fn with_bind(mut self, bind: IpAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Replace the cache limits
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Set the User-Agent forwarded to origin servers
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the upstream connect timeout; `None` waits indefinitely
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout_ms = timeout.map_or(0, millis);
        self
    }

    /// Set the upstream idle timeout; `None` waits indefinitely
    #[must_use]
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout_ms = timeout.map_or(0, millis);
        self
    }

    /// Set the response policy for unreachable origin servers
    #[must_use]
    pub fn with_unreachable_policy(mut self, policy: UnreachablePolicy) -> Self {
        self.unreachable_policy = policy;
        self
    }

    /// Set the longest line read in one piece
    #[must_use]
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    #[inline]
    #[must_use]
    pub fn connect_timeout(&self) -> Option<Duration> {
        optional(self.connect_timeout_ms)
    }

    #[inline]
    #[must_use]
    pub fn idle_timeout(&self) -> Option<Duration> {
        optional(self.idle_timeout_ms)
    }

    #[inline]
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl Validator for ProxyConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_socket_addr(self.listen_addr(), "listen address")?;
        ConfigValidator::validate_timeout(self.connect_timeout(), "connect timeout")?;
        ConfigValidator::validate_timeout(self.idle_timeout(), "idle timeout")?;
        ConfigValidator::validate_buffer_size(self.max_line_len, "max line length")?;

        if self.user_agent.contains(['\r', '\n']) {
            return Err(ConfigurationError::InvalidParameter(
                "user agent cannot contain line breaks".to_string(),
            ));
        }

        self.cache.validate()
    }
}
