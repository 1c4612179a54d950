//! Time-based debouncing for a single input

/// Debouncer for one digital input
///
/// Every change of the raw level restarts the timer. The raw level becomes
/// the stable level once it has stayed unchanged for the debounce time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Debouncer {
    raw: bool,
    stable: bool,
    changed_at_ms: u64,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            raw: false,
            stable: false,
            changed_at_ms: 0,
        }
    }

    /// Feed one sample
    ///
    /// Returns the new stable level when it changes on this sample.
    pub fn update(&mut self, raw: bool, now_ms: u64, debounce_ms: u32) -> Option<bool> {
        if raw != self.raw {
            self.raw = raw;
            self.changed_at_ms = now_ms;
            return None;
        }

        if raw != self.stable && now_ms.saturating_sub(self.changed_at_ms) >= debounce_ms as u64 {
            self.stable = raw;
            return Some(raw);
        }

        None
    }

    /// Last sampled level
    pub fn raw(&self) -> bool {
        self.raw
    }

    /// Last accepted level
    pub fn stable(&self) -> bool {
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settles_after_debounce_time() {
        let mut d = Debouncer::new();
        assert_eq!(d.update(true, 0, 30), None);
        assert_eq!(d.update(true, 29, 30), None);
        assert_eq!(d.update(true, 30, 30), Some(true));
        assert!(d.stable());
        // Reported once
        assert_eq!(d.update(true, 31, 30), None);
    }

    #[test]
    fn test_bounce_restarts_timer() {
        let mut d = Debouncer::new();
        d.update(true, 0, 30);
        d.update(false, 10, 30);
        d.update(true, 20, 30);
        assert_eq!(d.update(true, 45, 30), None);
        assert_eq!(d.update(true, 50, 30), Some(true));
    }

    #[test]
    fn test_short_glitch_ignored() {
        let mut d = Debouncer::new();
        d.update(true, 0, 30);
        d.update(false, 5, 30);
        for t in 6..100 {
            assert_eq!(d.update(false, t, 30), None);
        }
        assert!(!d.stable());
        assert!(!d.raw());
    }
}
