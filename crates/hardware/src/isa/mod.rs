//! Instruction Set Definitions.
//!
//! The platform CPUs execute a four-operation arithmetic instruction set. This module provides:
//! 1. **Instruction:** `Opcode` and the immutable `Instruction` triple with its `compute()`.
//! 2. **Decode:** Parsing of program text (`OPCODE OPERAND_L OPERAND_R` per line).

/// Program text decoding.
pub mod decode;

/// Opcodes and instruction evaluation.
pub mod instruction;

pub use decode::{decode_line, decode_program};
pub use instruction::{Instruction, Opcode};
