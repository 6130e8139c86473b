//! # Program Tests

use plasim_core::core::Program;
use plasim_core::isa::{Instruction, Opcode};

#[test]
fn test_compute_then_sentinel_then_restart() {
    let mut program = Program::parse("ADD 1 2\nSUB 3 4\n").unwrap();

    assert_eq!(program.compute(), Instruction::new(Opcode::Add, 1.0, 2.0));
    assert_eq!(program.pc(), 1);
    assert_eq!(program.compute(), Instruction::new(Opcode::Sub, 3.0, 4.0));
    assert_eq!(program.pc(), 2);

    assert!(program.compute().is_nop());
    assert_eq!(program.pc(), 0);
    assert_eq!(program.compute().opcode(), Opcode::Add);
}

#[test]
fn test_empty_program_always_returns_nop() {
    let mut program = Program::default();
    assert!(program.is_empty());
    for _ in 0..3 {
        assert_eq!(program.compute(), Instruction::NOP);
        assert_eq!(program.pc(), 0);
    }
}

#[test]
fn test_reset() {
    let mut program = Program::new(vec![Instruction::new(Opcode::Mul, 2.0, 2.0); 3]);
    let _ = program.compute();
    let _ = program.compute();
    program.reset();
    assert_eq!(program.pc(), 0);
    assert_eq!(program.len(), 3);
}

#[test]
fn test_instructions_keep_file_order_and_skip_comments() {
    let program = Program::parse("# header\nMUL 2 3\n\nDIV 8 4\n").unwrap();
    assert_eq!(
        program.instructions(),
        &[
            Instruction::new(Opcode::Mul, 2.0, 3.0),
            Instruction::new(Opcode::Div, 8.0, 4.0),
        ]
    );
    assert!(Program::default().instructions().is_empty());
}
