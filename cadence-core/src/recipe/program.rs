//! Recipe storage
//!
//! A recipe is the raw byte program one actuator plays back. It is
//! immutable once built and is only read through [`Recipe::instruction`].

use heapless::Vec;

use super::opcode::{codes, Instruction};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of instruction bytes in a recipe
pub const MAX_RECIPE_LEN: usize = 100;

/// Errors building a recipe from raw bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecipeError {
    /// No instructions given
    Empty,
    /// More than [`MAX_RECIPE_LEN`] instructions
    TooLong,
}

/// Stored recipe program
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Recipe {
    bytes: Vec<u8, MAX_RECIPE_LEN>,
}

impl Recipe {
    /// Build a recipe from encoded instruction bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecipeError> {
        if bytes.is_empty() {
            return Err(RecipeError::Empty);
        }
        let bytes = Vec::from_slice(bytes).map_err(|_| RecipeError::TooLong)?;
        Ok(Self { bytes })
    }

    /// The stock choreography both actuators run out of the box
    pub fn demo() -> Self {
        use codes::*;

        let bytes = [
            MOVE,
            MOVE + 5,
            MOVE,
            MOVE + 3,
            LOOP_START,
            MOVE + 1,
            MOVE + 4,
            LOOP_END,
            MOVE,
            MOVE + 2,
            WAIT,
            MOVE + 3,
            WAIT,
            MOVE + 2,
            MOVE + 3,
            WAIT + 31,
            WAIT + 31,
            WAIT + 31,
            MOVE + 4,
            RECIPE_END,
        ];

        let mut vec = Vec::new();
        for byte in bytes {
            // 20 bytes always fit
            let _ = vec.push(byte);
        }
        Self { bytes: vec }
    }

    /// Number of instruction bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty recipes are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the instruction at `index`
    pub fn instruction(&self, index: usize) -> Option<Instruction> {
        self.bytes.get(index).copied().map(Instruction::decode)
    }
}
