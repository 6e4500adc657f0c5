//! Tick timing

pub mod coordinator;

pub use coordinator::{Barrier, TimingCoordinator};
