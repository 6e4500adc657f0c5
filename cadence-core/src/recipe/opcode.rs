//! Instruction byte encoding
//!
//! Byte format:
//! - bits 7..5: opcode
//! - bits 4..0: parameter (0-31)
//!
//! ```text
//! ┌─────────┬────────────────┐
//! │ OPCODE  │ PARAMETER      │
//! │ 3 bits  │ 5 bits         │
//! └─────────┴────────────────┘
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mask selecting the opcode bits of an instruction byte
pub const OPCODE_MASK: u8 = 0b1110_0000;

/// Mask selecting the parameter bits of an instruction byte
pub const PARAMETER_MASK: u8 = 0b0001_1111;

/// Largest value the parameter field can hold
pub const MAX_PARAMETER: u8 = PARAMETER_MASK;

/// Opcode field values
pub mod codes {
    pub const RECIPE_END: u8 = 0x00;
    pub const MOVE: u8 = 0x20;
    pub const WAIT: u8 = 0x40;
    pub const LOOP_START: u8 = 0x80;
    pub const LOOP_END: u8 = 0xA0;
}

/// Instruction opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Opcode {
    /// Move to the slot given by the parameter
    Move,
    /// Hold for `parameter` wait units
    Wait,
    /// Open a loop that runs its body `parameter` times
    LoopStart,
    /// Close the open loop
    LoopEnd,
    /// Stop and rewind to the first instruction
    RecipeEnd,
    /// Opcode bits outside the code table
    Invalid,
}

impl Opcode {
    /// Map the high three bits of a byte to an opcode
    pub const fn from_bits(byte: u8) -> Self {
        match byte & OPCODE_MASK {
            codes::MOVE => Opcode::Move,
            codes::WAIT => Opcode::Wait,
            codes::LOOP_START => Opcode::LoopStart,
            codes::LOOP_END => Opcode::LoopEnd,
            codes::RECIPE_END => Opcode::RecipeEnd,
            _ => Opcode::Invalid,
        }
    }

    /// Opcode field value, or `None` for [`Opcode::Invalid`]
    pub const fn bits(self) -> Option<u8> {
        match self {
            Opcode::Move => Some(codes::MOVE),
            Opcode::Wait => Some(codes::WAIT),
            Opcode::LoopStart => Some(codes::LOOP_START),
            Opcode::LoopEnd => Some(codes::LOOP_END),
            Opcode::RecipeEnd => Some(codes::RECIPE_END),
            Opcode::Invalid => None,
        }
    }
}

/// A decoded recipe instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Instruction {
    /// Operation to perform
    pub opcode: Opcode,
    /// Low five bits of the source byte (0-31)
    pub parameter: u8,
}

impl Instruction {
    /// Build an instruction, clamping the parameter into the 5-bit field
    pub const fn new(opcode: Opcode, parameter: u8) -> Self {
        Self {
            opcode,
            parameter: parameter & PARAMETER_MASK,
        }
    }

    /// Decode one recipe byte
    ///
    /// Total over all 256 byte values. Unknown opcode bits produce
    /// [`Opcode::Invalid`]; the parameter is returned either way.
    pub const fn decode(byte: u8) -> Self {
        Self {
            opcode: Opcode::from_bits(byte),
            parameter: byte & PARAMETER_MASK,
        }
    }

    /// Encode back into a recipe byte
    ///
    /// Returns `None` for [`Opcode::Invalid`], which has no single encoding.
    pub const fn encode(self) -> Option<u8> {
        match self.opcode.bits() {
            Some(bits) => Some(bits | (self.parameter & PARAMETER_MASK)),
            None => None,
        }
    }
}

impl From<u8> for Instruction {
    fn from(byte: u8) -> Self {
        Self::decode(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_code_table() {
        assert_eq!(Instruction::decode(0x25), Instruction::new(Opcode::Move, 5));
        assert_eq!(Instruction::decode(0x5F), Instruction::new(Opcode::Wait, 31));
        assert_eq!(
            Instruction::decode(0x83),
            Instruction::new(Opcode::LoopStart, 3)
        );
        assert_eq!(Instruction::decode(0xA0), Instruction::new(Opcode::LoopEnd, 0));
        assert_eq!(
            Instruction::decode(0x00),
            Instruction::new(Opcode::RecipeEnd, 0)
        );
    }

    #[test]
    fn test_decode_invalid_keeps_parameter() {
        for byte in [0x60u8, 0x7F, 0xC4, 0xE9, 0xFF] {
            let ins = Instruction::decode(byte);
            assert_eq!(ins.opcode, Opcode::Invalid);
            assert_eq!(ins.parameter, byte & 0x1F);
        }
    }

    #[test]
    fn test_encode_invalid_is_none() {
        assert_eq!(Instruction::new(Opcode::Invalid, 4).encode(), None);
        assert_eq!(Instruction::new(Opcode::Move, 4).encode(), Some(0x24));
    }

    proptest! {
        #[test]
        fn prop_decode_total(byte in any::<u8>()) {
            let ins = Instruction::decode(byte);
            prop_assert_eq!(ins.parameter, byte & 0x1F);

            let expected = match byte >> 5 {
                0b000 => Opcode::RecipeEnd,
                0b001 => Opcode::Move,
                0b010 => Opcode::Wait,
                0b100 => Opcode::LoopStart,
                0b101 => Opcode::LoopEnd,
                _ => Opcode::Invalid,
            };
            prop_assert_eq!(ins.opcode, expected);

            if ins.opcode != Opcode::Invalid {
                prop_assert_eq!(ins.encode(), Some(byte));
            }
        }
    }
}
