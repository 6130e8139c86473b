//! Opcodes and instruction evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::ArithmeticFault;

/// Operation performed by an instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// No operation. Ends the executing core's quantum.
    #[default]
    Nop,
    /// `operand_l + operand_r`.
    Add,
    /// `operand_l - operand_r`.
    Sub,
    /// `operand_l * operand_r`.
    Mul,
    /// `operand_l / operand_r`.
    Div,
}

impl Opcode {
    /// Decodes a mnemonic. Anything other than `ADD`, `SUB`, `MUL` or `DIV` is `Nop`.
    pub fn from_mnemonic(mnemonic: &str) -> Self {
        match mnemonic {
            "ADD" => Self::Add,
            "SUB" => Self::Sub,
            "MUL" => Self::Mul,
            "DIV" => Self::Div,
            _ => Self::Nop,
        }
    }

    /// Upper-case mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One arithmetic instruction with two immediate operands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    opcode: Opcode,
    operand_l: f64,
    operand_r: f64,
}

impl Instruction {
    /// The `NOP` returned when a program wraps.
    pub const NOP: Self = Self::new(Opcode::Nop, 0.0, 0.0);

    /// Creates an instruction.
    pub const fn new(opcode: Opcode, operand_l: f64, operand_r: f64) -> Self {
        Self {
            opcode,
            operand_l,
            operand_r,
        }
    }

    /// Operation of this instruction.
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Left operand.
    pub const fn operand_l(&self) -> f64 {
        self.operand_l
    }

    /// Right operand.
    pub const fn operand_r(&self) -> f64 {
        self.operand_r
    }

    /// Returns `true` for `NOP`.
    pub fn is_nop(&self) -> bool {
        self.opcode == Opcode::Nop
    }

    /// Evaluates the instruction. `NOP` evaluates to `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticFault::DivisionByZero`] for `DIV` with a zero right operand.
    pub fn compute(&self) -> Result<f64, ArithmeticFault> {
        let (l, r) = (self.operand_l, self.operand_r);
        Ok(match self.opcode {
            Opcode::Nop => 0.0,
            Opcode::Add => l + r,
            Opcode::Sub => l - r,
            Opcode::Mul => l * r,
            Opcode::Div if r == 0.0 => {
                return Err(ArithmeticFault::DivisionByZero { dividend: l });
            }
            Opcode::Div => l / r,
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.opcode, self.operand_l, self.operand_r)
    }
}
