//! Core `ProxyBuilder` and `Proxy` types
//!
//! The builder only edits a `ProxyConfig`; validation happens once in
//! [`ProxyBuilder::build`], which also creates the shared cache.

use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use proxycache_core::config::{ConfigurationError, Validator};
use proxycache_core::{Forwarder, ObjectCache, ProxyConfig, Result, Server, UnreachablePolicy};

/// Fluent builder for a [`Proxy`]
#[derive(Debug, Clone, Default)]
pub struct ProxyBuilder {
    config: ProxyConfig,
    cache: Option<Arc<ObjectCache>>,
}

impl ProxyBuilder {
    /// Start from the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    #[must_use]
    pub fn from_config(config: ProxyConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Port to listen on
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Address to listen on
    #[must_use]
    pub fn bind(mut self, bind: IpAddr) -> Self {
        self.config.bind = bind;
        self
    }

    /// Number of cache slots
    #[must_use]
    pub fn slots(mut self, slot_count: usize) -> Self {
        self.config.cache = self.config.cache.with_slot_count(slot_count);
        self
    }

    /// Responses of this many bytes or more are relayed but never cached
    #[must_use]
    pub fn max_object_size(mut self, bytes: usize) -> Self {
        self.config.cache = self.config.cache.with_max_object_size(bytes);
        self
    }

    /// Total bytes the cache may hold
    #[must_use]
    pub fn max_cache_size(mut self, bytes: usize) -> Self {
        self.config.cache = self.config.cache.with_max_cache_size(bytes);
        self
    }

    /// User-Agent sent to origin servers
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Upstream connect timeout; `None` waits indefinitely
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config = self.config.with_connect_timeout(timeout);
        self
    }

    /// Upstream idle timeout per line; `None` waits indefinitely
    #[must_use]
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config = self.config.with_idle_timeout(timeout);
        self
    }

    /// Answer unreachable origins with `502 Bad Gateway` instead of closing silently
    #[must_use]
    pub fn bad_gateway(mut self, enabled: bool) -> Self {
        self.config.unreachable_policy = if enabled {
            UnreachablePolicy::BadGateway
        } else {
            UnreachablePolicy::Silent
        };
        self
    }

    /// Share an existing cache instead of creating one.
    ///
    /// The cache keeps its own limits; the builder's cache settings are then
    /// only validated, not applied.
    #[must_use]
    pub fn shared_cache(mut self, cache: Arc<ObjectCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Configuration as currently built
    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Validate the configuration and assemble the proxy
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` found by validation.
    pub fn build(self) -> std::result::Result<Proxy, ConfigurationError> {
        self.config.validate()?;

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ObjectCache::new(self.config.cache.clone())));
        let forwarder = Arc::new(Forwarder::new(self.config.clone(), cache));

        Ok(Proxy {
            config: self.config,
            forwarder,
        })
    }
}

/// Configured proxy, ready to bind
#[derive(Debug, Clone)]
pub struct Proxy {
    config: ProxyConfig,
    forwarder: Arc<Forwarder>,
}

impl Proxy {
    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Forwarder shared by every connection task
    #[must_use]
    pub fn forwarder(&self) -> &Arc<Forwarder> {
        &self.forwarder
    }

    /// Cache shared by every connection task
    #[must_use]
    pub fn cache(&self) -> &Arc<ObjectCache> {
        self.forwarder.cache()
    }

    /// Bind the listening socket without starting to accept
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the address cannot be bound.
    pub async fn bind(&self) -> Result<Server> {
        Server::bind(&self.config, Arc::clone(&self.forwarder)).await
    }

    /// Bind and accept connections until `shutdown` completes
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the address cannot be bound.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let server = self.bind().await?;
        tracing::info!(
            target: "proxycache::api",
            addr = %server.local_addr()?,
            slots = self.config.cache.slot_count,
            max_object_size = self.config.cache.max_object_size,
            "Proxy listening"
        );
        server.run_until(shutdown).await
    }
}
