//! Servo output trait
//!
//! The engine only knows slots. Converting a slot into a pulse width and
//! driving the timer channel belongs to the board HAL.

use crate::actuator::{ActuatorId, Position};

/// Driver for the servo outputs
pub trait ServoOutput {
    /// Error type for output operations
    type Error;

    /// Command `actuator` to `position`
    ///
    /// Must return only once the new pulse width is latched, so the tick
    /// barrier delay covers the physical travel.
    fn set_position(&mut self, actuator: ActuatorId, position: Position)
        -> Result<(), Self::Error>;
}
