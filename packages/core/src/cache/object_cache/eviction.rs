//! Slot selection for the writer path

use super::super::slot::CacheSlot;

/// Pick the slot the next insert overwrites.
///
/// Scans in index order: the first unoccupied slot wins outright; otherwise the
/// occupied slot with the smallest use count, ties going to the lowest index.
/// Returns `None` only for a cache with no slots.
pub(super) fn choose_slot(slots: &[CacheSlot]) -> Option<usize> {
    let mut victim: Option<(usize, u64)> = None;

    for (index, slot) in slots.iter().enumerate() {
        if !slot.occupied {
            return Some(index);
        }

        let count = slot.use_count();
        match victim {
            Some((_, lowest)) if count >= lowest => {}
            _ => victim = Some((index, count)),
        }
    }

    victim.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn filled(counts: &[u64]) -> Vec<CacheSlot> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let mut slot = CacheSlot::default();
                slot.fill(&format!("http://host/{i}"), Bytes::from_static(b"x"));
                for _ in 0..count {
                    slot.record_use();
                }
                slot
            })
            .collect()
    }

    #[test]
    fn test_empty_array_has_no_victim() {
        assert_eq!(choose_slot(&[]), None);
    }

    #[test]
    fn test_first_free_slot_preferred() {
        let mut slots = filled(&[0, 0, 0]);
        slots.push(CacheSlot::default());
        slots.push(CacheSlot::default());
        assert_eq!(choose_slot(&slots), Some(3));
    }

    #[test]
    fn test_free_slot_beats_lower_count_later() {
        let mut slots = filled(&[5, 5]);
        slots[1] = CacheSlot::default();
        slots.extend(filled(&[0]));
        assert_eq!(choose_slot(&slots), Some(1));
    }

    #[test]
    fn test_lowest_use_count_evicted() {
        let slots = filled(&[3, 2, 7, 1, 4]);
        assert_eq!(choose_slot(&slots), Some(3));
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let slots = filled(&[2, 1, 3, 1, 1]);
        assert_eq!(choose_slot(&slots), Some(1));

        let slots = filled(&[0, 0, 0]);
        assert_eq!(choose_slot(&slots), Some(0));
    }
}
