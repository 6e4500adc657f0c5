//! Serial operator console
//!
//! Couples a UART to the [`LineEditor`]. A tick only waits on the operator
//! once they have started typing; an idle receiver passes straight through.

use cadence_hal::uart::{UartRx, UartTx};

use super::line::{CommandLine, LineEditor, LineEvent, BACKSPACE};

/// Prompt written after every handled line
pub const PROMPT: &[u8] = b"\r\n>";

/// Result of polling the console once
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleInput {
    /// No byte was waiting
    Idle,
    /// The operator aborted the line
    Aborted,
    /// A complete line
    Line(CommandLine),
}

/// Operator console over a UART
pub struct OperatorConsole<U> {
    uart: U,
    editor: LineEditor,
}

impl<U, E> OperatorConsole<U>
where
    U: UartTx<Error = E> + UartRx<Error = E>,
{
    /// Wrap a UART
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            editor: LineEditor::new(),
        }
    }

    /// Underlying UART
    pub fn uart(&self) -> &U {
        &self.uart
    }

    /// Underlying UART, mutably
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Write raw bytes to the operator
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), E> {
        self.uart.write_blocking(bytes)
    }

    /// Read one command line if the operator has started typing
    ///
    /// Echoes as it goes. Blocks until the line is submitted or aborted.
    pub fn poll_line(&mut self) -> Result<ConsoleInput, E> {
        let Some(mut byte) = self.uart.try_read_byte()? else {
            return Ok(ConsoleInput::Idle);
        };

        loop {
            match self.editor.feed(byte) {
                LineEvent::Stored(c) => self.uart.write_blocking(&[c])?,
                LineEvent::Erased => self.uart.write_blocking(&[BACKSPACE])?,
                LineEvent::Ignored => {}
                LineEvent::Aborted(c) => {
                    self.uart.write_blocking(&[c])?;
                    self.uart.write_blocking(PROMPT)?;
                    return Ok(ConsoleInput::Aborted);
                }
                LineEvent::Submitted(line) => return Ok(ConsoleInput::Line(line)),
            }
            byte = self.uart.read_byte()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::NEWLINE;
    use crate::testing::ScriptedUart;

    #[test]
    fn test_idle_passes_through() {
        let mut console = OperatorConsole::new(ScriptedUart::default());
        assert_eq!(console.poll_line(), Ok(ConsoleInput::Idle));
        assert!(console.uart().output.is_empty());
    }

    #[test]
    fn test_line_is_echoed() {
        let mut console = OperatorConsole::new(ScriptedUart::with_input(b"pC\r"));
        assert_eq!(
            console.poll_line(),
            Ok(ConsoleInput::Line(CommandLine::from_bytes(b"pC")))
        );
        assert_eq!(console.uart_mut().take_output(), "pC");
    }

    #[test]
    fn test_backspace_echo() {
        let mut console =
            OperatorConsole::new(ScriptedUart::with_input(&[BACKSPACE, b'R', BACKSPACE, b'L', NEWLINE]));
        assert_eq!(
            console.poll_line(),
            Ok(ConsoleInput::Line(CommandLine::from_bytes(b"L")))
        );
        assert_eq!(console.uart().output, vec![b'R', BACKSPACE, b'L']);
    }

    #[test]
    fn test_abort_echoes_and_prompts() {
        let mut console = OperatorConsole::new(ScriptedUart::with_input(b"Cx"));
        assert_eq!(console.poll_line(), Ok(ConsoleInput::Aborted));
        assert_eq!(console.uart_mut().take_output(), "Cx\r\n>");
    }

    #[test]
    fn test_leaves_following_bytes_unread() {
        let mut console = OperatorConsole::new(ScriptedUart::with_input(b"N\rP"));
        console.poll_line().unwrap();
        assert_eq!(console.uart().input.len(), 1);
    }
}
