//! Proxycache Public API
//!
//! Caching HTTP/1.0 forward proxy. Build a [`Proxy`] with the fluent
//! [`ProxyBuilder`], then run it until shutdown. Every connection is served by
//! its own task and every task shares one bounded object cache.

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;
pub mod cli;

pub use builder::*;

// Re-export the engine types callers need to inspect a running proxy
pub use proxycache_core::{
    CacheConfig, CacheStats, Error, Forwarder, InsertOutcome, ObjectCache, Outcome, ProxyConfig,
    ProxyStats, ProxyStatsSnapshot, Result, Server, SlotInfo, UnreachablePolicy,
};
pub use proxycache_core::config::ConfigurationError;

/// Main entry point providing static builder methods
pub struct Proxycache;

impl Proxycache {
    /// Start a builder from the default configuration
    ///
    /// Shorthand for `ProxyBuilder::new()`
    #[must_use]
    pub fn builder() -> ProxyBuilder {
        ProxyBuilder::new()
    }

    /// Start a builder from an existing configuration
    #[must_use]
    pub fn with_config(config: ProxyConfig) -> ProxyBuilder {
        ProxyBuilder::from_config(config)
    }
}

/// Start a builder listening on `port`
///
/// Shorthand for `ProxyBuilder::new().port(port)`
#[must_use]
pub fn listen(port: u16) -> ProxyBuilder {
    ProxyBuilder::new().port(port)
}
