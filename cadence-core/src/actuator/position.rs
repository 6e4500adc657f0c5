//! Discrete servo positions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of discrete slots a servo can occupy
pub const NUM_POSITIONS: usize = 6;

/// One of the six servo slots (0 = fully left, 5 = fully right)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position(u8);

impl Position {
    /// Leftmost slot
    pub const MIN: Position = Position(0);
    /// Rightmost slot
    pub const MAX: Position = Position(NUM_POSITIONS as u8 - 1);

    /// Create a position, rejecting slots outside 0..=5
    pub const fn new(slot: u8) -> Option<Self> {
        if slot <= Self::MAX.0 {
            Some(Position(slot))
        } else {
            None
        }
    }

    /// Slot index
    pub const fn slot(self) -> u8 {
        self.0
    }

    /// Slot index for table lookups
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// One slot to the right, if there is one
    pub fn right(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// One slot to the left, if there is one
    pub fn left(self) -> Option<Self> {
        self.0.checked_sub(1).map(Position)
    }

    /// Number of slots between two positions
    pub fn distance(self, other: Position) -> u8 {
        self.0.abs_diff(other.0)
    }
}
