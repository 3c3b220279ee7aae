//! Bounded in-memory object cache shared by every connection
//!
//! This module provides the proxy's response cache:
//! - A fixed array of slots keyed by the raw request target
//! - First-reader/last-reader admission so lookups never block each other
//! - A single writer at a time for insertion and eviction
//! - Usage-count eviction (lowest count wins, lowest index breaks ties)
//! - Size ceilings per object and for the whole cache

pub mod cache_config;
pub mod cache_stats;
pub mod gate;
pub mod object_cache;
pub mod slot;

pub use cache_config::CacheConfig;
pub use cache_stats::{CacheStats, CacheStatsSnapshot};
pub use object_cache::{InsertOutcome, ObjectCache};
pub use slot::{CacheSlot, SlotInfo};
