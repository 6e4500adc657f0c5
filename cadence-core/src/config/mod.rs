//! Configuration types
//!
//! Built into the firmware from `machine.toml` at compile time.

pub mod types;

pub use types::{ConfigError, MachineConfig, ServoConfig, TimingConfig};
