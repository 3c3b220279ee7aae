//! Cache statistics and metrics tracking

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for the object cache
#[derive(Debug)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: AtomicU64,
    /// Number of cache misses
    pub misses: AtomicU64,
    /// Number of inserts into an unoccupied slot
    pub insertions: AtomicU64,
    /// Number of inserts that overwrote an occupied slot
    pub evictions: AtomicU64,
    /// Number of inserts refused by the size ceilings
    pub rejected: AtomicU64,
    /// Total bytes held across occupied slots
    pub bytes_stored: AtomicU64,
    /// Number of occupied slots
    pub entries: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
    pub rejected: u64,
    pub bytes_stored: u64,
    pub entries: u64,
}

impl CacheStats {
    /// Create new cache statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an insert into a free slot
    pub fn record_insertion(&self) {
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an insert that displaced an occupied slot
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an insert refused by the size ceilings
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Update bytes stored
    pub fn update_bytes_stored(&self, bytes: u64) {
        self.bytes_stored.store(bytes, Ordering::Relaxed);
    }

    /// Update entry count
    pub fn update_entries(&self, count: u64) {
        self.entries.store(count, Ordering::Relaxed);
    }

    /// Get hit ratio
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            (hits as f64) / (total as f64)
        }
    }

    /// Get statistics snapshot
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            bytes_stored: self.bytes_stored.load(Ordering::Relaxed),
            entries: self.entries.load(Ordering::Relaxed),
        }
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            insertions: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            bytes_stored: AtomicU64::new(0),
            entries: AtomicU64::new(0),
        }
    }
}
