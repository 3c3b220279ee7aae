//! Cache slot storage unit

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;

/// One fixed storage unit holding at most one cached response.
///
/// `use_count` is atomic because concurrent readers bump it while sharing
/// reader admission; every other field only changes under the writer lock.
#[derive(Debug, Default)]
pub struct CacheSlot {
    pub(crate) url: String,
    pub(crate) content: Bytes,
    pub(crate) use_count: AtomicU64,
    pub(crate) occupied: bool,
}

impl CacheSlot {
    /// Whether this slot holds the response for `url`
    #[inline]
    pub(crate) fn matches(&self, url: &str) -> bool {
        self.occupied && self.url == url
    }

    #[inline]
    pub(crate) fn use_count(&self) -> u64 {
        self.use_count.load(Ordering::Relaxed)
    }

    pub(crate) fn record_use(&self) {
        self.use_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Overwrite the slot in place with a fresh object
    pub(crate) fn fill(&mut self, url: &str, content: Bytes) {
        self.url.clear();
        self.url.push_str(url);
        self.content = content;
        *self.use_count.get_mut() = 0;
        self.occupied = true;
    }

    pub(crate) fn len(&self) -> usize {
        if self.occupied { self.content.len() } else { 0 }
    }

    pub(crate) fn info(&self, index: usize) -> SlotInfo {
        SlotInfo {
            index,
            url: self.occupied.then(|| self.url.clone()),
            len: self.len(),
            use_count: self.use_count(),
            occupied: self.occupied,
        }
    }
}

/// Read-only view of a slot, taken under reader admission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    pub index: usize,
    pub url: Option<String>,
    pub len: usize,
    pub use_count: u64,
    pub occupied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unoccupied_slot_never_matches() {
        let slot = CacheSlot::default();
        assert!(!slot.matches(""));
        assert_eq!(slot.use_count(), 0);
        assert_eq!(slot.len(), 0);
    }

    #[test]
    fn test_fill_resets_use_count() {
        let mut slot = CacheSlot::default();
        slot.fill("http://a/", Bytes::from_static(b"one"));
        slot.record_use();
        slot.record_use();
        assert_eq!(slot.use_count(), 2);

        slot.fill("http://b/", Bytes::from_static(b"two!"));
        assert_eq!(slot.use_count(), 0);
        assert!(slot.matches("http://b/"));
        assert!(!slot.matches("http://a/"));
        assert_eq!(slot.len(), 4);
    }
}
