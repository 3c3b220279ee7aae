//! Proxy-wide counters
//!
//! Lock-free counters describing how connections ended. Cache-level counters
//! live with the cache in [`crate::cache::CacheStats`].

pub mod proxy_stats;

pub use proxy_stats::{ProxyStats, ProxyStatsSnapshot};
