//! Operator-visible notices
//!
//! Everything the engine reports goes to the operator console as one of
//! these fixed messages. Nothing is thrown across component boundaries.

use crate::actuator::{ActuatorId, FaultKind};

/// Messages written to the operator console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    /// Start-up banner
    Banner,
    /// Unrecognized command character for an actuator
    InvalidCommand { actuator: ActuatorId, input: u8 },
    /// An actuator faulted and stopped for good
    RecipeFault { actuator: ActuatorId, kind: FaultKind },
    /// Undecodable recipe byte; the actuator paused on it
    InvalidInstruction { actuator: ActuatorId, index: usize, byte: u8 },
    /// At least one actuator reached RECIPE_END this tick
    RecipeEnded,
}

impl Notice {
    /// Console text for this notice
    pub fn message(&self) -> &'static [u8] {
        match self {
            Notice::Banner => b"Enter 'Cc' to begin routine:\r\n>",
            Notice::InvalidCommand { .. } => b"\r\nInvalid Command\r\n>",
            Notice::RecipeFault { .. } => b"Error State; Check recipe\r\n>",
            Notice::InvalidInstruction { .. } => b"Invalid Recipe\r\n>",
            Notice::RecipeEnded => b"Recipe ended; 'cc' to replay\r\n>",
        }
    }

    /// Check if this notice reports a terminal fault
    pub fn is_fault(&self) -> bool {
        matches!(self, Notice::RecipeFault { .. })
    }
}
