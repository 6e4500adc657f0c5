//! Hardware abstraction traits
//!
//! These traits define the interface between the recipe engine and the
//! board-specific output drivers. The operator console uses
//! [`cadence_hal::uart`] and the tick barrier uses
//! [`embedded_hal::delay::DelayNs`].

pub mod servo;

pub use servo::ServoOutput;
