//! Core processor implementation.
//!
//! This module contains the platform CPU and the state it steps through:
//! 1. **Program:** The cyclic instruction sequence with its program counter.
//! 2. **Register:** The output FIFO consumers read results from.
//! 3. **Cpu:** Core rotation and per-cycle instruction stepping.

/// CPU component and its execution loop.
pub mod cpu;

/// Cyclic instruction sequence.
pub mod program;

/// Output result FIFO.
pub mod register;

pub use self::cpu::Cpu;
pub use self::program::Program;
pub use self::register::Register;
