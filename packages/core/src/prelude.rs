//! Canonical types for embedding the proxy

pub use crate::cache::{CacheConfig, CacheStats, InsertOutcome, ObjectCache, SlotInfo};
pub use crate::config::{ProxyConfig, UnreachablePolicy};
pub use crate::forward::{Forwarder, Outcome};
pub use crate::http::uri::{ResolvedUri, resolve};
pub use crate::server::Server;
pub use crate::telemetry::{ProxyStats, ProxyStatsSnapshot};
