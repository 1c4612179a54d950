//! Measurement history
//!
//! A fixed-capacity ring of accepted speeds. Entries live in a compacted
//! `heapless::Vec`; `write_index` marks the slot of the most recent write.
//! Until the ring wraps, new entries go to the end. Once full, each new
//! entry overwrites the slot after `write_index`, which is the oldest one.
//! Removing an entry shifts later slots down and keeps `write_index` on the
//! newest surviving entry.

use heapless::Vec;

use crate::config::HISTORY_SIZE;

/// Bounded ring of speeds in m/s
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer<const N: usize = HISTORY_SIZE> {
    entries: Vec<f32, N>,
    write_index: Option<usize>,
}

impl<const N: usize> HistoryBuffer<N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            write_index: None,
        }
    }

    /// Record a new speed, overwriting the oldest entry when full
    pub fn push(&mut self, speed_mps: f32) {
        if N == 0 {
            return;
        }

        let slot = match self.write_index {
            None => 0,
            Some(w) => (w + 1) % N,
        };

        if let Err(speed_mps) = self.entries.insert(slot, speed_mps) {
            self.entries[slot] = speed_mps;
        }
        self.write_index = Some(slot);
    }

    /// Remove the entry at `index`, compacting the slots after it
    pub fn remove(&mut self, index: usize) -> Option<f32> {
        if index >= self.entries.len() {
            return None;
        }

        let removed = self.entries.remove(index);
        let len = self.entries.len();

        self.write_index = match self.write_index {
            _ if len == 0 => None,
            Some(w) if index < w => Some(w - 1),
            // The newest entry is gone; the one written before it wins
            Some(0) if index == 0 => Some(len - 1),
            Some(w) if index == w => Some(w - 1),
            other => other,
        };

        Some(removed)
    }

    /// Overwrite the entry at `index`
    ///
    /// Returns `false` if there is no entry there.
    pub fn set(&mut self, index: usize, speed_mps: f32) -> bool {
        match self.entries.get_mut(index) {
            Some(slot) => {
                *slot = speed_mps;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.entries.get(index).copied()
    }

    /// Most recently written entry
    pub fn latest(&self) -> Option<f32> {
        self.write_index.and_then(|w| self.get(w))
    }

    /// Slot of the most recent write, `None` when empty
    pub fn write_index(&self) -> Option<usize> {
        self.write_index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.write_index = None;
    }

    /// Entries in slot order
    pub fn as_slice(&self) -> &[f32] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn filled<const N: usize>(values: &[f32]) -> HistoryBuffer<N> {
        let mut h = HistoryBuffer::new();
        for &v in values {
            h.push(v);
        }
        h
    }

    #[test]
    fn test_empty() {
        let h: HistoryBuffer<4> = HistoryBuffer::new();
        assert!(h.is_empty());
        assert_eq!(h.write_index(), None);
        assert_eq!(h.latest(), None);
        assert_eq!(h.get(0), None);
    }

    #[test]
    fn test_append_until_full() {
        let h: HistoryBuffer<3> = filled(&[1.0, 2.0, 3.0]);
        assert_eq!(h.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(h.write_index(), Some(2));
        assert!(h.is_full());
    }

    #[test]
    fn test_overflow_overwrites_oldest() {
        let mut h: HistoryBuffer<3> = filled(&[1.0, 2.0, 3.0]);
        h.push(4.0);
        assert_eq!(h.as_slice(), &[4.0, 2.0, 3.0]);
        assert_eq!(h.write_index(), Some(0));
        h.push(5.0);
        assert_eq!(h.as_slice(), &[4.0, 5.0, 3.0]);
        assert_eq!(h.latest(), Some(5.0));
    }

    #[test]
    fn test_remove_before_write_index() {
        let mut h: HistoryBuffer<4> = filled(&[1.0, 2.0, 3.0]);
        assert_eq!(h.remove(0), Some(1.0));
        assert_eq!(h.as_slice(), &[2.0, 3.0]);
        assert_eq!(h.write_index(), Some(1));
    }

    #[test]
    fn test_remove_newest() {
        let mut h: HistoryBuffer<4> = filled(&[1.0, 2.0, 3.0]);
        assert_eq!(h.remove(2), Some(3.0));
        assert_eq!(h.latest(), Some(2.0));
    }

    #[test]
    fn test_remove_newest_at_slot_zero_after_wrap() {
        let mut h: HistoryBuffer<3> = filled(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(h.write_index(), Some(0));
        h.remove(0);
        assert_eq!(h.as_slice(), &[2.0, 3.0]);
        assert_eq!(h.latest(), Some(3.0));
    }

    #[test]
    fn test_push_after_remove_in_wrapped_ring() {
        let mut h: HistoryBuffer<3> = filled(&[1.0, 2.0, 3.0, 4.0]);
        // [4, 2, 3], newest at 0; drop 3
        h.remove(2);
        h.push(5.0);
        assert_eq!(h.as_slice(), &[4.0, 5.0, 2.0]);
        assert_eq!(h.latest(), Some(5.0));
    }

    #[test]
    fn test_remove_last_entry_empties() {
        let mut h: HistoryBuffer<3> = filled(&[1.0]);
        h.remove(0);
        assert!(h.is_empty());
        assert_eq!(h.write_index(), None);
        assert_eq!(h.remove(0), None);
    }

    #[test]
    fn test_set_and_clear() {
        let mut h: HistoryBuffer<3> = filled(&[1.0, 2.0]);
        assert!(h.set(1, 9.0));
        assert!(!h.set(2, 9.0));
        assert_eq!(h.get(1), Some(9.0));

        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.write_index(), None);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(f32),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0.1f32..50.0).prop_map(Op::Push),
            1 => (0usize..10).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity(ops in prop::collection::vec(op(), 0..200)) {
            let mut h: HistoryBuffer<8> = HistoryBuffer::new();
            for op in ops {
                match op {
                    Op::Push(v) => {
                        let expected_slot = match h.write_index() {
                            Some(w) if h.is_full() => (w + 1) % 8,
                            Some(w) => w + 1,
                            None => 0,
                        };
                        h.push(v);
                        prop_assert_eq!(h.write_index(), Some(expected_slot));
                        prop_assert_eq!(h.latest(), Some(v));
                    }
                    Op::Remove(i) => {
                        h.remove(i);
                    }
                }

                prop_assert!(h.len() <= h.capacity());
                match h.write_index() {
                    Some(w) => prop_assert!(w < h.len()),
                    None => prop_assert!(h.is_empty()),
                }
            }
        }
    }
}
