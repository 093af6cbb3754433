//! Fixed-storage sample window
//!
//! ## Overview
//!
//! A ring buffer over a fixed `[f32; MAX_TAPS]` array with a runtime
//! length, shared by everything in the engine that needs recent-sample
//! memory: SMA/FIR history and the LMS/RLS input buffers. The storage is
//! inline, so a channel never allocates after construction, and the
//! configured length can change at runtime (reconfiguration) without
//! changing the memory footprint.
//!
//! ## Discipline
//!
//! Writes advance a cursor modulo the configured length, overwriting the
//! oldest sample once full; recent data is always worth more than old
//! data here. Reads walk *backward* from the cursor: [`Window::back`]`(0)`
//! is the newest sample, `back(1)` the one before it, and so on. Every
//! filter's dot product uses this newest-first indexing, so tap index `k`
//! always means "k samples ago".

use crate::constants::MAX_TAPS;

/// Ring buffer of recent raw samples with a runtime length.
///
/// The configured length must be in `[1, MAX_TAPS]`; construction is only
/// reachable through validated configuration, which guarantees that.
#[derive(Debug, Clone)]
pub struct Window {
    /// Inline storage; only the first `length` slots are ever used
    data: [f32; MAX_TAPS],
    /// Configured logical capacity
    length: usize,
    /// Number of valid samples (grows to `length`, then stays)
    len: usize,
    /// Next write position, wraps modulo `length`
    write_pos: usize,
}

impl Window {
    /// Create an empty window of the given logical length.
    pub fn new(length: usize) -> Self {
        debug_assert!(length >= 1 && length <= MAX_TAPS);
        Self {
            data: [0.0; MAX_TAPS],
            length: length.clamp(1, MAX_TAPS),
            len: 0,
            write_pos: 0,
        }
    }

    /// Append a sample, overwriting the oldest when full.
    pub fn push(&mut self, value: f32) {
        self.data[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % self.length;
        if self.len < self.length {
            self.len += 1;
        }
    }

    /// Fill the whole window with one value (first-sample seeding).
    pub fn fill(&mut self, value: f32) {
        for slot in self.data[..self.length].iter_mut() {
            *slot = value;
        }
        self.len = self.length;
        self.write_pos = 0;
    }

    /// Sample `k` steps before the newest one; `back(0)` is the newest.
    pub fn back(&self, k: usize) -> Option<f32> {
        if k >= self.len {
            return None;
        }
        let idx = (self.write_pos + self.length - 1 - k) % self.length;
        Some(self.data[idx])
    }

    /// Most recent sample.
    pub fn newest(&self) -> Option<f32> {
        self.back(0)
    }

    /// Number of valid samples.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no sample has been pushed since creation or `clear`.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once `length` samples have been seen.
    pub fn is_full(&self) -> bool {
        self.len == self.length
    }

    /// Configured logical capacity.
    pub fn capacity(&self) -> usize {
        self.length
    }

    /// Drop all samples, keeping the configured length.
    pub fn clear(&mut self) {
        self.len = 0;
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window() {
        let w = Window::new(4);
        assert!(w.is_empty());
        assert_eq!(w.newest(), None);
        assert_eq!(w.back(0), None);
    }

    #[test]
    fn backward_reads_are_newest_first() {
        let mut w = Window::new(3);
        w.push(1.0);
        w.push(2.0);
        w.push(3.0);
        assert_eq!(w.back(0), Some(3.0));
        assert_eq!(w.back(1), Some(2.0));
        assert_eq!(w.back(2), Some(1.0));
        assert_eq!(w.back(3), None);
    }

    #[test]
    fn overwrites_oldest_when_full() {
        let mut w = Window::new(3);
        for i in 0..5 {
            w.push(i as f32);
        }
        assert_eq!(w.len(), 3);
        assert!(w.is_full());
        // 0.0 and 1.0 were overwritten
        assert_eq!(w.back(0), Some(4.0));
        assert_eq!(w.back(2), Some(2.0));
    }

    #[test]
    fn fill_seeds_whole_window() {
        let mut w = Window::new(4);
        w.fill(7.5);
        assert!(w.is_full());
        for k in 0..4 {
            assert_eq!(w.back(k), Some(7.5));
        }
        // Next push displaces exactly one seeded value
        w.push(1.0);
        assert_eq!(w.back(0), Some(1.0));
        assert_eq!(w.back(1), Some(7.5));
    }

    #[test]
    fn clear_keeps_length() {
        let mut w = Window::new(2);
        w.push(1.0);
        w.clear();
        assert!(w.is_empty());
        assert_eq!(w.capacity(), 2);
    }
}
