//! Connection outcome statistics

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::forward::Outcome;

/// Counters for every terminal state a connection can reach
#[derive(Debug, Default)]
pub struct ProxyStats {
    /// Connections handed to the forwarder
    pub connections: AtomicU64,
    /// Clients that sent nothing usable before closing
    pub client_gone: AtomicU64,
    /// Request lines with fewer than three tokens
    pub malformed: AtomicU64,
    /// Non-GET requests answered with 501
    pub not_implemented: AtomicU64,
    /// Requests served from the cache
    pub cache_hits: AtomicU64,
    /// Origins that could not be reached
    pub unreachable: AtomicU64,
    /// Responses relayed from an origin
    pub relayed: AtomicU64,
    /// Relayed responses that were stored in the cache
    pub cached: AtomicU64,
    /// Connections that ended with an I/O error or timeout
    pub errors: AtomicU64,
    /// Bytes written to clients, from cache or origin
    pub bytes_served: AtomicU64,
}

/// Point-in-time copy of [`ProxyStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProxyStatsSnapshot {
    pub connections: u64,
    pub client_gone: u64,
    pub malformed: u64,
    pub not_implemented: u64,
    pub cache_hits: u64,
    pub unreachable: u64,
    pub relayed: u64,
    pub cached: u64,
    pub errors: u64,
    pub bytes_served: u64,
}

impl ProxyStats {
    pub fn record_connection(&self) {
        self.connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Count the terminal state of one served connection
    pub fn record(&self, result: &Result<Outcome>) {
        let counter = match result {
            Ok(Outcome::ClientGone) => &self.client_gone,
            Ok(Outcome::MalformedRequest) => &self.malformed,
            Ok(Outcome::NotImplemented { .. }) => &self.not_implemented,
            Ok(Outcome::UpstreamUnreachable) => &self.unreachable,
            Ok(Outcome::CacheHit { bytes }) => {
                self.bytes_served.fetch_add(*bytes as u64, Ordering::Relaxed);
                &self.cache_hits
            }
            Ok(Outcome::Relayed { bytes, cached }) => {
                self.bytes_served.fetch_add(*bytes as u64, Ordering::Relaxed);
                if *cached {
                    self.cached.fetch_add(1, Ordering::Relaxed);
                }
                &self.relayed
            }
            Err(_) => &self.errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProxyStatsSnapshot {
        ProxyStatsSnapshot {
            connections: self.connections.load(Ordering::Relaxed),
            client_gone: self.client_gone.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            not_implemented: self.not_implemented.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            unreachable: self.unreachable.load(Ordering::Relaxed),
            relayed: self.relayed.load(Ordering::Relaxed),
            cached: self.cached.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            bytes_served: self.bytes_served.load(Ordering::Relaxed),
        }
    }
}
