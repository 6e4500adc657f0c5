//! Operator command line editor
//!
//! Byte-at-a-time editor for the serial console. Holds at most one
//! character per actuator.
//!
//! - CR (13) submits the line
//! - DEL (127) erases the last character
//! - `x` / `X` aborts the line
//! - a character past the per-actuator limit submits what was typed

use heapless::Vec;

use crate::actuator::ActuatorId;
use crate::NUM_ACTUATORS;

/// Line terminator (carriage return)
pub const NEWLINE: u8 = 13;

/// Erase-previous-character key
pub const BACKSPACE: u8 = 127;

/// Maximum data characters per line
pub const MAX_LINE_CHARS: usize = NUM_ACTUATORS;

/// A submitted line: one optional command character per actuator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandLine {
    chars: Vec<u8, MAX_LINE_CHARS>,
}

impl CommandLine {
    /// Build a line from raw characters, dropping any past the limit
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut chars = Vec::new();
        for &b in bytes.iter().take(MAX_LINE_CHARS) {
            let _ = chars.push(b);
        }
        Self { chars }
    }

    /// Character addressed to `actuator`, if one was typed
    pub fn char_for(&self, actuator: ActuatorId) -> Option<u8> {
        self.chars.get(actuator.index()).copied()
    }

    /// Typed characters in actuator order
    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }
}

/// Result of feeding one byte to the editor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEvent {
    /// Character buffered; echo it
    Stored(u8),
    /// Last character removed; echo the backspace
    Erased,
    /// Nothing to erase; no echo
    Ignored,
    /// Line complete
    Submitted(CommandLine),
    /// Line discarded; echo the abort character
    Aborted(u8),
}

/// In-progress command line
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    buffer: Vec<u8, MAX_LINE_CHARS>,
}

impl LineEditor {
    /// Create an empty editor
    pub fn new() -> Self {
        Self::default()
    }

    /// Characters typed so far
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Discard the in-progress line
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Feed one received byte
    pub fn feed(&mut self, byte: u8) -> LineEvent {
        match byte {
            NEWLINE => self.submit(),
            b'x' | b'X' => {
                self.reset();
                LineEvent::Aborted(byte)
            }
            BACKSPACE => {
                if self.buffer.pop().is_some() {
                    LineEvent::Erased
                } else {
                    LineEvent::Ignored
                }
            }
            _ => match self.buffer.push(byte) {
                Ok(()) => LineEvent::Stored(byte),
                // Overflow: excess character dropped, line submitted as typed
                Err(_) => self.submit(),
            },
        }
    }

    fn submit(&mut self) -> LineEvent {
        let line = CommandLine {
            chars: self.buffer.clone(),
        };
        self.reset();
        LineEvent::Submitted(line)
    }
}
