//! Sensor and button sides
//!
//! The device is symmetric: every light gate and every button exists once
//! on the left and once on the right. Per-side state is stored in
//! two-element tables indexed by [`Channel::index`].

/// One side of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    /// Fixed scan order: left first, then right
    pub const ALL: [Channel; 2] = [Channel::Left, Channel::Right];

    /// The opposite side
    pub const fn other(self) -> Self {
        match self {
            Channel::Left => Channel::Right,
            Channel::Right => Channel::Left,
        }
    }

    /// Index into a per-channel table
    pub const fn index(self) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_is_involution() {
        for channel in Channel::ALL {
            assert_ne!(channel.other(), channel);
            assert_eq!(channel.other().other(), channel);
        }
    }

    #[test]
    fn test_index_matches_scan_order() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }
}
