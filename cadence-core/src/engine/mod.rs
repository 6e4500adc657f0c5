//! Recipe engine
//!
//! Drives both actuators through their recipes one tick at a time.

pub mod events;
pub mod runner;

pub use events::Notice;
pub use runner::{EngineError, RecipeEngine, TickSummary};
