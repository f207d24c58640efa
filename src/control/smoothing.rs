//! Sliding-window moving average over raw ADC samples.
//!
//! Fixed-size ring buffer with a running sum: subtract the slot about to be
//! overwritten, store the new sample, add it, advance the cursor. O(1) per
//! update, no allocation. The window starts zero-filled, so the first
//! `N - 1` outputs ramp up from zero exactly like the unweighted average
//! the board has always used.

use super::{ADC_MAX, SMOOTHING_SAMPLES};

/// Unweighted moving average of the last `N` samples.
#[derive(Debug, Clone)]
pub struct MovingAverage<const N: usize = SMOOTHING_SAMPLES> {
    ring: [u16; N],
    cursor: usize,
    sum: u32,
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MovingAverage<N> {
    pub const fn new() -> Self {
        assert!(N > 0, "moving average window must be non-empty");
        Self {
            ring: [0; N],
            cursor: 0,
            sum: 0,
        }
    }

    /// Push one raw sample and return the conditioned value.
    ///
    /// Samples above full scale are clamped so the output always stays
    /// inside the ADC range.
    pub fn update(&mut self, raw: u16) -> u16 {
        let raw = raw.min(ADC_MAX);
        self.sum -= u32::from(self.ring[self.cursor]);
        self.ring[self.cursor] = raw;
        self.sum += u32::from(raw);
        self.cursor = (self.cursor + 1) % N;
        self.value()
    }

    /// Current conditioned value (`sum / N`, truncating).
    pub fn value(&self) -> u16 {
        (self.sum / N as u32) as u16
    }
}
