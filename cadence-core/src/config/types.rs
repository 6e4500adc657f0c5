//! Configuration type definitions
//!
//! Defaults reproduce the reference bench: 200 ms per slot of travel,
//! 100 ms per wait unit, and a 50 Hz servo frame with 0.1 ms ticks.

use crate::actuator::{Position, NUM_POSITIONS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tick barrier timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Delay per slot of travel (µs)
    pub move_unit_us: u32,
    /// Delay per WAIT unit (µs)
    pub wait_unit_us: u32,
    /// Settle delay after an operator R/L move (µs)
    pub settle_us: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            move_unit_us: 200_000,
            wait_unit_us: 100_000,
            settle_us: 200_000,
        }
    }
}

/// Servo pulse generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServoConfig {
    /// Pulse width per slot, in timer ticks
    pub pulse_widths: [u16; NUM_POSITIONS],
    /// Frame length in timer ticks
    pub period_ticks: u16,
    /// Timer tick rate (Hz)
    pub tick_hz: u32,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            pulse_widths: [4, 7, 10, 13, 16, 19],
            period_ticks: 200,
            tick_hz: 10_000,
        }
    }
}

impl ServoConfig {
    /// Pulse width for a slot, in timer ticks
    pub fn pulse_width(&self, position: Position) -> u16 {
        self.pulse_widths[position.index()]
    }

    /// Frame rate implied by the tick rate and period
    pub fn frame_hz(&self) -> u32 {
        self.tick_hz / u32::from(self.period_ticks.max(1))
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineConfig {
    pub timing: TimingConfig,
    pub servo: ServoConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A timing unit is zero
    ZeroTimeUnit,
    /// Pulse widths must strictly increase from slot 0 to slot 5
    PulseWidthsNotIncreasing,
    /// A pulse is as long as the frame
    PulseExceedsPeriod,
    /// Tick rate is zero or slower than one frame per second
    InvalidTickRate,
}

impl MachineConfig {
    /// Check the configuration for values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        if t.move_unit_us == 0 || t.wait_unit_us == 0 || t.settle_us == 0 {
            return Err(ConfigError::ZeroTimeUnit);
        }

        let widths = &self.servo.pulse_widths;
        if widths.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::PulseWidthsNotIncreasing);
        }

        if widths[NUM_POSITIONS - 1] >= self.servo.period_ticks {
            return Err(ConfigError::PulseExceedsPeriod);
        }

        if self.servo.tick_hz < u32::from(self.servo.period_ticks) {
            return Err(ConfigError::InvalidTickRate);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = MachineConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.servo.frame_hz(), 50);
        assert_eq!(config.servo.pulse_width(Position::MAX), 19);
    }

    #[test]
    fn test_rejects_zero_units() {
        let mut config = MachineConfig::default();
        config.timing.wait_unit_us = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeUnit));
    }

    #[test]
    fn test_rejects_bad_pulse_table() {
        let mut config = MachineConfig::default();
        config.servo.pulse_widths = [4, 7, 7, 13, 16, 19];
        assert_eq!(config.validate(), Err(ConfigError::PulseWidthsNotIncreasing));

        let mut config = MachineConfig::default();
        config.servo.pulse_widths = [4, 7, 10, 13, 16, 200];
        assert_eq!(config.validate(), Err(ConfigError::PulseExceedsPeriod));
    }

    #[test]
    fn test_rejects_slow_tick() {
        let mut config = MachineConfig::default();
        config.servo.tick_hz = 100;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTickRate));
    }
}
