//! Recipe programs
//!
//! Encoding lives only at this boundary: everything downstream works on
//! decoded [`Instruction`] values.

pub mod assembler;
pub mod opcode;
pub mod program;

pub use assembler::{assemble, AssembleError};
pub use opcode::{Instruction, Opcode, MAX_PARAMETER};
pub use program::{Recipe, RecipeError, MAX_RECIPE_LEN};
