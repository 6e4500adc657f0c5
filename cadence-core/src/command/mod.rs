//! Operator command handling
//!
//! The serial console delivers lines of up to one character per actuator;
//! [`processor::apply_line`] turns them into per-actuator overrides.

pub mod console;
pub mod line;
pub mod processor;

pub use console::{ConsoleInput, OperatorConsole, PROMPT};
pub use line::{CommandLine, LineEditor, LineEvent, BACKSPACE, MAX_LINE_CHARS, NEWLINE};
pub use processor::{apply_line, Command, LineOutcome, Override};
