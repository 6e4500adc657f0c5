//! Mnemonic recipe assembler
//!
//! Turns the human-readable recipe form used in `machine.toml` into
//! instruction bytes:
//!
//! ```text
//! # sweep three times
//! LOOP 3
//!   MOV 0
//!   MOV 5
//! ENDLOOP
//! WAIT 10
//! END
//! ```
//!
//! Mnemonics are case-insensitive. `#` starts a comment. MOVE targets and
//! loop pairing are checked at runtime, not here.

use heapless::Vec;

use super::opcode::{Instruction, Opcode, MAX_PARAMETER};
use super::program::{Recipe, MAX_RECIPE_LEN};

/// Assembly errors, with the 1-based source line where relevant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssembleError {
    /// Mnemonic not recognized
    UnknownMnemonic { line: usize },
    /// Instruction requires a parameter
    MissingParameter { line: usize },
    /// Instruction takes no parameter, or extra tokens follow it
    UnexpectedParameter { line: usize },
    /// Parameter is not a number in 0..=31
    InvalidParameter { line: usize },
    /// More than [`MAX_RECIPE_LEN`] instructions
    TooLong { line: usize },
    /// Source contains no instructions
    Empty,
}

/// Assemble mnemonic source into a recipe
pub fn assemble(source: &str) -> Result<Recipe, AssembleError> {
    let mut bytes: Vec<u8, MAX_RECIPE_LEN> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = match raw.split_once('#') {
            Some((code, _comment)) => code,
            None => raw,
        }
        .trim();

        if text.is_empty() {
            continue;
        }

        let instruction = parse_line(text, line)?;
        // Opcode::Invalid is never produced by parse_line
        let byte = instruction
            .encode()
            .ok_or(AssembleError::UnknownMnemonic { line })?;
        bytes
            .push(byte)
            .map_err(|_| AssembleError::TooLong { line })?;
    }

    Recipe::from_bytes(&bytes).map_err(|_| AssembleError::Empty)
}

fn parse_line(text: &str, line: usize) -> Result<Instruction, AssembleError> {
    let mut tokens = text.split_whitespace();
    let mnemonic = tokens.next().ok_or(AssembleError::Empty)?;
    let param = tokens.next();

    if tokens.next().is_some() {
        return Err(AssembleError::UnexpectedParameter { line });
    }

    let opcode = mnemonic_opcode(mnemonic).ok_or(AssembleError::UnknownMnemonic { line })?;

    match opcode {
        Opcode::Move | Opcode::Wait | Opcode::LoopStart => {
            let param = param.ok_or(AssembleError::MissingParameter { line })?;
            let value: u8 = param
                .parse()
                .map_err(|_| AssembleError::InvalidParameter { line })?;
            if value > MAX_PARAMETER {
                return Err(AssembleError::InvalidParameter { line });
            }
            Ok(Instruction::new(opcode, value))
        }
        _ => {
            if param.is_some() {
                return Err(AssembleError::UnexpectedParameter { line });
            }
            Ok(Instruction::new(opcode, 0))
        }
    }
}

fn mnemonic_opcode(mnemonic: &str) -> Option<Opcode> {
    const TABLE: [(&str, Opcode); 9] = [
        ("MOV", Opcode::Move),
        ("MOVE", Opcode::Move),
        ("WAIT", Opcode::Wait),
        ("LOOP", Opcode::LoopStart),
        ("LOOP_START", Opcode::LoopStart),
        ("ENDLOOP", Opcode::LoopEnd),
        ("LOOP_END", Opcode::LoopEnd),
        ("END", Opcode::RecipeEnd),
        ("RECIPE_END", Opcode::RecipeEnd),
    ];

    TABLE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(mnemonic))
        .map(|(_, opcode)| *opcode)
}
