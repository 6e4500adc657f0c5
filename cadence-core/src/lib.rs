//! Board-agnostic core logic for the dual-servo recipe firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Recipe encoding (opcode decoder, mnemonic assembler)
//! - Per-actuator state machine (instruction pointer, loops, faults)
//! - Operator command line editing and override processing
//! - Tick barrier timing
//! - The recipe engine that ties them together
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod actuator;
pub mod command;
pub mod config;
pub mod engine;
pub mod recipe;
pub mod timing;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use actuator::{ActuatorId, ActuatorState, FaultKind, Position, RunStatus, StepReport};
pub use engine::{EngineError, Notice, RecipeEngine, TickSummary};
pub use recipe::{Instruction, Opcode, Recipe};

/// Number of independently driven actuators
pub const NUM_ACTUATORS: usize = 2;
