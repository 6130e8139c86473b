//! CPU component definition.
//!
//! This module defines the `Cpu` structure, which coordinates:
//! 1. **Program:** A shared cyclic instruction sequence all cores step through in turn.
//! 2. **Core Rotation:** `active_core` advances each time the program wraps; after the last
//!    core, rotation returns to core 0 and the cycle's remaining step budget is forfeited.
//! 3. **Output:** Results are pushed to a `Register` FIFO drained by `read()`.

/// Per-cycle instruction stepping.
pub mod execution;

use crate::common::DataValue;
use crate::config::CpuConfig;
use crate::core::program::Program;
use crate::core::register::Register;
use crate::sim::context::SimContext;
use crate::soc::traits::{Component, ComponentKind, Readable, Simulatable};

/// Program-stepping processor with round-robin cores.
#[derive(Clone, Debug)]
pub struct Cpu {
    label: String,
    frequency: u32,
    n_cores: u32,
    active_core: u32,
    program: Program,
    register: Register,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::from_config(&CpuConfig::default(), Program::default())
    }
}

impl Cpu {
    /// Creates a CPU. `n_cores` is floored at 1.
    pub fn new(label: &str, n_cores: u32, frequency: u32, program: Program) -> Self {
        Self {
            label: label.to_owned(),
            frequency,
            n_cores: n_cores.max(1),
            active_core: 0,
            program,
            register: Register::new(),
        }
    }

    /// Builds a CPU from its configuration and an already decoded program.
    pub fn from_config(config: &CpuConfig, program: Program) -> Self {
        Self::new(&config.label, config.n_cores, config.frequency, program)
    }

    /// Replaces the program and rewinds it.
    pub fn load_program(&mut self, mut program: Program) {
        program.reset();
        self.program = program;
    }

    /// Instruction steps attempted per cycle.
    pub const fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Sets the per-cycle step budget.
    pub fn set_frequency(&mut self, frequency: u32) {
        self.frequency = frequency;
    }

    /// Number of cores.
    pub const fn n_cores(&self) -> u32 {
        self.n_cores
    }

    /// Sets the number of cores (floor 1). The active core is brought back into range.
    pub fn set_n_cores(&mut self, n_cores: u32) {
        self.n_cores = n_cores.max(1);
        if self.active_core >= self.n_cores {
            self.active_core = 0;
        }
    }

    /// Core currently executing, in `[0, n_cores)`.
    pub const fn active_core(&self) -> u32 {
        self.active_core
    }

    /// The program and its counter.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Results waiting to be read.
    pub const fn register(&self) -> &Register {
        &self.register
    }
}

impl Readable for Cpu {
    fn read(&mut self) -> DataValue {
        self.register.pop()
    }
}

impl Simulatable for Cpu {
    fn simulate(&mut self, ctx: &mut SimContext<'_>) {
        self.execute_cycle(ctx.stats_mut());
    }

    fn describe(&self) -> String {
        format!(
            "CPU label=\"{}\" frequency={} n_cores={} active_core={} pc={}/{} pending_results={}",
            self.label,
            self.frequency,
            self.n_cores,
            self.active_core,
            self.program.pc(),
            self.program.len(),
            self.register.len()
        )
    }
}

impl Component for Cpu {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Cpu
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: &str) {
        label.clone_into(&mut self.label);
    }

    fn as_readable_mut(&mut self) -> Option<&mut dyn Readable> {
        Some(self)
    }

    fn as_cpu(&self) -> Option<&Cpu> {
        Some(self)
    }
}
