//! Fixed-capacity object cache keyed by request target
//!
//! Provides the `ObjectCache` struct: an array of `slot_count` slots behind a
//! first-reader/last-reader [`Gate`], plus the configured size ceilings and
//! statistics.

mod eviction;
mod operations;

use super::cache_config::CacheConfig;
use super::cache_stats::CacheStats;
use super::gate::Gate;
use super::slot::CacheSlot;

pub use operations::InsertOutcome;

/// Bounded response cache shared by every connection handler.
///
/// Created once with every slot unoccupied; slots are overwritten in place by
/// [`ObjectCache::insert`] and never individually freed.
#[derive(Debug)]
pub struct ObjectCache {
    pub(super) slots: Gate<Vec<CacheSlot>>,
    pub(super) config: CacheConfig,
    pub(super) stats: CacheStats,
}

impl ObjectCache {
    /// Create an empty cache sized by `config`
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let slots = std::iter::repeat_with(CacheSlot::default)
            .take(config.slot_count)
            .collect();

        Self {
            slots: Gate::new(slots),
            config,
            stats: CacheStats::default(),
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get the limits this cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of slots, occupied or not
    pub fn capacity(&self) -> usize {
        self.config.slot_count
    }
}

impl Default for ObjectCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
