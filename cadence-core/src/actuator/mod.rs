//! Actuator state
//!
//! One [`ActuatorState`] per servo, addressed by [`ActuatorId`].

pub mod machine;
pub mod position;

pub use machine::{ActuatorState, FaultKind, LoopFrame, RunStatus, StepNotice, StepReport};
pub use position::{Position, NUM_POSITIONS};

use crate::NUM_ACTUATORS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of an actuator in the engine's state table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActuatorId(u8);

impl ActuatorId {
    /// Every actuator, in stepping order
    pub const ALL: [ActuatorId; NUM_ACTUATORS] = [ActuatorId(0), ActuatorId(1)];

    /// Create an id, rejecting indices past the last actuator
    pub const fn new(index: usize) -> Option<Self> {
        if index < NUM_ACTUATORS {
            Some(ActuatorId(index as u8))
        } else {
            None
        }
    }

    /// Position in the state table
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
