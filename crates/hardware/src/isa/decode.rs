//! Program text decoder.
//!
//! A program file holds one instruction per line as three whitespace-separated fields:
//! `OPCODE OPERAND_L OPERAND_R`. Blank lines and lines starting with `#` are skipped.
//! Unrecognized opcodes decode to `NOP`; missing or non-numeric operands are load errors.

use crate::common::LoadError;
use crate::isa::instruction::{Instruction, Opcode};

/// Decodes one program line.
///
/// Returns `Ok(None)` for blank and comment lines. `line_no` is one-based and only used in the
/// error.
pub fn decode_line(line_no: usize, text: &str) -> Result<Option<Instruction>, LoadError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let malformed = || LoadError::MalformedInstruction {
        line: line_no,
        text: trimmed.to_owned(),
    };

    let mut fields = trimmed.split_whitespace();
    let (Some(mnemonic), Some(l), Some(r), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed());
    };
    let operand_l = l.parse::<f64>().map_err(|_| malformed())?;
    let operand_r = r.parse::<f64>().map_err(|_| malformed())?;

    let opcode = Opcode::from_mnemonic(mnemonic);
    if opcode == Opcode::Nop && mnemonic != "NOP" {
        tracing::debug!(line = line_no, mnemonic, "unknown opcode decoded as NOP");
    }
    Ok(Some(Instruction::new(opcode, operand_l, operand_r)))
}

/// Decodes a whole program, stopping at the first malformed line.
pub fn decode_program(text: &str) -> Result<Vec<Instruction>, LoadError> {
    let mut instructions = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(instruction) = decode_line(i + 1, line)? {
            instructions.push(instruction);
        }
    }
    Ok(instructions)
}
