//! Instruction stepping for one CPU cycle.
//!
//! Each cycle attempts up to `frequency` steps. A step fetches the next instruction:
//! 1. **Arithmetic:** The result is pushed to the register immediately. A division by zero is
//!    reported and yields `0.0`.
//! 2. **NOP:** The active core's quantum is over. The next core takes the program, or, after
//!    the last core, rotation restarts at core 0, the program rewinds and the cycle ends early.

use super::Cpu;
use crate::common::DataValue;
use crate::isa::instruction::Instruction;
use crate::stats::SimStats;

/// Result of a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// An arithmetic instruction produced a result.
    Executed,
    /// A core finished its quantum and the next core is active.
    CoreSwitched,
    /// The last core finished; the program was rewound.
    Wrapped,
}

impl Cpu {
    /// Runs one cycle worth of steps, recording activity in `stats`.
    pub fn execute_cycle(&mut self, stats: &mut SimStats) {
        for _ in 0..self.frequency {
            if self.step(stats) == StepOutcome::Wrapped {
                break;
            }
        }
    }

    /// Fetches and executes one instruction.
    pub fn step(&mut self, stats: &mut SimStats) -> StepOutcome {
        let instruction = self.program.compute();
        if !instruction.is_nop() {
            self.execute(&instruction, stats);
            return StepOutcome::Executed;
        }

        if self.active_core + 1 >= self.n_cores {
            self.active_core = 0;
            self.program.reset();
            stats.program_wraps += 1;
            tracing::trace!(cpu = %self.label, "program wrapped on last core");
            StepOutcome::Wrapped
        } else {
            self.active_core += 1;
            tracing::trace!(cpu = %self.label, core = self.active_core, "core switch");
            StepOutcome::CoreSwitched
        }
    }

    fn execute(&mut self, instruction: &Instruction, stats: &mut SimStats) {
        stats.instructions_executed += 1;
        let result = instruction.compute().unwrap_or_else(|fault| {
            tracing::warn!(cpu = %self.label, %instruction, %fault, "arithmetic fault; result is 0");
            stats.div_by_zero += 1;
            0.0
        });
        self.register.push(DataValue::new(result));
    }
}
