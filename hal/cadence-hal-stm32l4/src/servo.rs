//! Servo PWM output for STM32L4
//!
//! Both servos share one timer so their frames stay in phase. Actuator 0
//! drives channel 1, actuator 1 drives channel 2. Pulse widths come from
//! the configured slot table, expressed as a fraction of the frame.

use core::convert::Infallible;

use cadence_core::actuator::{ActuatorId, Position};
use cadence_core::config::ServoConfig;
use cadence_core::traits::ServoOutput;
use embassy_stm32::timer::simple_pwm::SimplePwm;
use embassy_stm32::timer::GeneralInstance4Channel;

/// Two servo channels on one timer
pub struct ServoPwm<'d, T: GeneralInstance4Channel> {
    pwm: SimplePwm<'d, T>,
    config: ServoConfig,
}

impl<'d, T: GeneralInstance4Channel> ServoPwm<'d, T> {
    /// Take ownership of a timer configured for the servo frame rate
    ///
    /// Channels 1 and 2 are enabled immediately at slot 0.
    pub fn new(pwm: SimplePwm<'d, T>, config: ServoConfig) -> Self {
        let mut servo = Self { pwm, config };
        for id in ActuatorId::ALL {
            servo.latch(id, Position::MIN);
        }
        servo.pwm.ch1().enable();
        servo.pwm.ch2().enable();
        servo
    }

    fn latch(&mut self, actuator: ActuatorId, position: Position) {
        let width = self.config.pulse_width(position);
        let period = self.config.period_ticks;
        match actuator.index() {
            0 => self.pwm.ch1().set_duty_cycle_fraction(width, period),
            _ => self.pwm.ch2().set_duty_cycle_fraction(width, period),
        }
    }
}

impl<T: GeneralInstance4Channel> ServoOutput for ServoPwm<'_, T> {
    type Error = Infallible;

    fn set_position(&mut self, actuator: ActuatorId, position: Position) -> Result<(), Self::Error> {
        self.latch(actuator, position);
        Ok(())
    }
}
