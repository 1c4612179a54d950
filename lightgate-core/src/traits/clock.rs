//! Monotonic time source

/// Monotonic clock with microsecond resolution
///
/// The measurement engine busy-waits on this clock, so `now_micros` must be
/// cheap and must never go backwards. Takes `&mut self` so simulated clocks
/// can advance on every read.
pub trait Clock {
    /// Microseconds since an arbitrary fixed epoch
    fn now_micros(&mut self) -> u64;

    /// Milliseconds since the same epoch
    fn now_millis(&mut self) -> u64 {
        self.now_micros() / 1000
    }
}
