//! In-memory doubles for the engine's peripherals

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use core::convert::Infallible;

use cadence_hal::uart::{UartRx, UartTx};
use embedded_hal::delay::DelayNs;

use crate::actuator::{ActuatorId, Position};
use crate::traits::ServoOutput;

/// UART that replays scripted input and captures output
#[derive(Debug, Default)]
pub struct ScriptedUart {
    pub input: VecDeque<u8>,
    pub output: Vec<u8>,
}

impl ScriptedUart {
    pub fn with_input(bytes: &[u8]) -> Self {
        Self {
            input: bytes.iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    pub fn take_output(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.output).into_owned();
        self.output.clear();
        text
    }
}

impl UartTx for ScriptedUart {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.output.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl UartRx for ScriptedUart {
    type Error = Infallible;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        for slot in buf.iter_mut() {
            *slot = self.input.pop_front().expect("scripted input exhausted");
        }
        Ok(buf.len())
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(self.input.pop_front())
    }
}

/// Servo output that records every command
#[derive(Debug, Default)]
pub struct RecordingServos {
    pub calls: Vec<(ActuatorId, Position)>,
}

impl ServoOutput for RecordingServos {
    type Error = Infallible;

    fn set_position(&mut self, actuator: ActuatorId, position: Position) -> Result<(), Self::Error> {
        self.calls.push((actuator, position));
        Ok(())
    }
}

/// Delay provider that records requested durations in microseconds
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub calls_us: Vec<u32>,
}

impl RecordingDelay {
    pub fn total_us(&self) -> u64 {
        self.calls_us.iter().map(|&us| u64::from(us)).sum()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls_us.push(ns / 1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.calls_us.push(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls_us.push(ms.saturating_mul(1_000));
    }
}
