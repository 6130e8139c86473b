//! Cyclic instruction sequence.
//!
//! `Program::compute()` hands out one instruction per call. Once the last instruction has been
//! handed out, the next call returns the `NOP` sentinel and rewinds to the start, so a program
//! behaves as an endless cycle with one `NOP` between laps.

use crate::common::LoadError;
use crate::isa::decode::decode_program;
use crate::isa::instruction::Instruction;

/// Ordered instructions plus a program counter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    instructions: Vec<Instruction>,
    pc: usize,
}

impl Program {
    /// Creates a program positioned at its first instruction.
    pub const fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            pc: 0,
        }
    }

    /// Decodes program text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MalformedInstruction`] for the first line that is not a valid
    /// `OPCODE OPERAND_L OPERAND_R` triple.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        decode_program(text).map(Self::new)
    }

    /// Returns the next instruction, or the `NOP` sentinel (rewinding) at the end.
    pub fn compute(&mut self) -> Instruction {
        match self.instructions.get(self.pc) {
            Some(instruction) => {
                self.pc += 1;
                *instruction
            }
            None => {
                self.reset();
                Instruction::NOP
            }
        }
    }

    /// Rewinds to the first instruction.
    pub fn reset(&mut self) {
        self.pc = 0;
    }

    /// Index of the next instruction.
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` for a program without instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}
