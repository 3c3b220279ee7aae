//! Lookup, insert and inspection
//!
//! Lookups run under shared reader admission; inserts hold the writer lock for
//! the whole scan-and-overwrite so url and content always change together.

use bytes::Bytes;

use super::super::slot::{CacheSlot, SlotInfo};
use super::ObjectCache;
use super::eviction::choose_slot;

/// What an insert did to the slot array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored in a previously unoccupied slot
    Inserted { slot: usize },
    /// Overwrote the occupied slot that held `evicted`
    Evicted { slot: usize, evicted: String },
    /// Refused by the per-object ceiling or the total budget
    Rejected,
}

impl InsertOutcome {
    /// Slot index that now holds the object, if it was stored
    #[must_use]
    pub fn slot(&self) -> Option<usize> {
        match self {
            InsertOutcome::Inserted { slot } | InsertOutcome::Evicted { slot, .. } => Some(*slot),
            InsertOutcome::Rejected => None,
        }
    }
}

impl ObjectCache {
    /// Look up the response cached for exactly `url`.
    ///
    /// Safe for any number of concurrent callers; lookups only wait for an
    /// in-progress insert. A hit bumps the slot's use count and returns a copy
    /// of its bytes, so the caller writes to the client after leaving the
    /// reader group.
    pub fn lookup(&self, url: &str) -> Option<Bytes> {
        let hit = {
            let slots = self.slots.read();
            slots.iter().find(|slot| slot.matches(url)).map(|slot| {
                slot.record_use();
                slot.content.clone()
            })
        };

        match hit {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }

        hit
    }

    /// Store `content` as the response for `url`.
    ///
    /// Fills the first free slot, or else evicts the slot with the lowest use
    /// count (lowest index on ties). Content at or above `max_object_size` is
    /// refused, as is anything that would push the cache over its byte budget.
    pub fn insert(&self, url: &str, content: Bytes) -> InsertOutcome {
        if !self.config.admits(content.len()) {
            self.stats.record_rejected();
            tracing::debug!(
                target: "proxycache::cache",
                url = url,
                size = content.len(),
                max_object_size = self.config.max_object_size,
                "Object too large to cache"
            );
            return InsertOutcome::Rejected;
        }

        let mut slots = self.slots.write();

        let Some(index) = choose_slot(&slots) else {
            self.stats.record_rejected();
            return InsertOutcome::Rejected;
        };

        let stored: usize = slots.iter().map(CacheSlot::len).sum();
        let projected = stored - slots[index].len() + content.len();
        if projected > self.config.max_cache_size {
            self.stats.record_rejected();
            tracing::debug!(
                target: "proxycache::cache",
                url = url,
                projected = projected,
                max_cache_size = self.config.max_cache_size,
                "Cache budget exceeded, object not stored"
            );
            return InsertOutcome::Rejected;
        }

        let slot = &mut slots[index];
        let outcome = if slot.occupied {
            let evicted = std::mem::take(&mut slot.url);
            tracing::debug!(
                target: "proxycache::cache",
                slot = index,
                evicted = %evicted,
                use_count = slot.use_count(),
                url = url,
                "Evicting cached object"
            );
            self.stats.record_eviction();
            InsertOutcome::Evicted { slot: index, evicted }
        } else {
            self.stats.record_insertion();
            InsertOutcome::Inserted { slot: index }
        };

        slot.fill(url, content);

        let occupied = slots.iter().filter(|slot| slot.occupied).count();
        self.stats.update_bytes_stored(projected as u64);
        self.stats.update_entries(occupied as u64);

        outcome
    }

    /// Snapshot every slot under reader admission. Does not count as a use.
    pub fn slots(&self) -> Vec<SlotInfo> {
        let slots = self.slots.read();
        slots
            .iter()
            .enumerate()
            .map(|(index, slot)| slot.info(index))
            .collect()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.read().iter().filter(|slot| slot.occupied).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes held across occupied slots
    pub fn bytes_stored(&self) -> usize {
        self.slots.read().iter().map(CacheSlot::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;

    #[test]
    fn test_lookup_miss_on_empty_cache() {
        let cache = ObjectCache::default();
        assert!(cache.lookup("http://example.test/").is_none());
        assert_eq!(cache.stats().snapshot().misses, 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_then_lookup_exact_url() {
        let cache = ObjectCache::default();
        let outcome = cache.insert("http://example.test/a", Bytes::from_static(b"HTTP/1.0 200 OK\r\n\r\nhi"));
        assert_eq!(outcome, InsertOutcome::Inserted { slot: 0 });

        let hit = cache.lookup("http://example.test/a");
        assert_eq!(hit.as_deref(), Some(&b"HTTP/1.0 200 OK\r\n\r\nhi"[..]));

        // No normalization of the key.
        assert!(cache.lookup("http://example.test:80/a").is_none());
        assert!(cache.lookup("http://example.test/a/").is_none());
    }

    #[test]
    fn test_hit_increments_use_count() {
        let cache = ObjectCache::default();
        cache.insert("u", Bytes::from_static(b"body"));
        cache.lookup("u");
        cache.lookup("u");

        let slots = cache.slots();
        assert_eq!(slots[0].use_count, 2);
        assert_eq!(slots[0].url.as_deref(), Some("u"));
        assert_eq!(cache.stats().snapshot().hits, 2);
    }

    #[test]
    fn test_oversized_object_rejected() {
        let cache = ObjectCache::new(CacheConfig::tiny());
        let content = Bytes::from(vec![b'x'; 1024]);
        assert_eq!(cache.insert("big", content), InsertOutcome::Rejected);
        assert!(cache.lookup("big").is_none());

        let content = Bytes::from(vec![b'x'; 1023]);
        assert_eq!(cache.insert("fits", content).slot(), Some(0));
        assert_eq!(cache.bytes_stored(), 1023);
    }

    #[test]
    fn test_budget_enforced_when_limits_conflict() {
        let config = CacheConfig::tiny().with_max_cache_size(1500);
        let cache = ObjectCache::new(config);
        assert!(cache.insert("a", Bytes::from(vec![0; 1000])).slot().is_some());
        assert_eq!(cache.insert("b", Bytes::from(vec![0; 1000])), InsertOutcome::Rejected);
        assert_eq!(cache.len(), 1);
        assert!(cache.bytes_stored() <= 1500);
    }

    #[test]
    fn test_zero_slot_cache_never_stores() {
        let config = CacheConfig { slot_count: 0, ..CacheConfig::default() };
        let cache = ObjectCache::new(config);
        assert_eq!(cache.insert("a", Bytes::from_static(b"a")), InsertOutcome::Rejected);
        assert!(cache.lookup("a").is_none());
    }
}
