//! Simulation statistics collection and reporting.
//!
//! This module tracks activity counters for a platform run. It provides:
//! 1. **Cycles:** Number of platform cycles advanced.
//! 2. **Processing:** Instructions executed, program wraps, and arithmetic faults.
//! 3. **Data movement:** Bus transfers, memory writes and evictions.
//! 4. **Output:** Display refreshes and values shown.

use std::time::Instant;

use serde::Serialize;

/// Activity counters for one simulation run.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    /// Total platform cycles elapsed.
    pub cycles: u64,
    /// Non-NOP instructions computed by all CPUs.
    pub instructions_executed: u64,
    /// Times a CPU program reached its end and rewound.
    pub program_wraps: u64,
    /// Divisions by zero reported (each produced `0.0`).
    pub div_by_zero: u64,
    /// Values moved from a source into a bus pending queue.
    pub bus_transfers: u64,
    /// Values written into memory ring buffers.
    pub memory_writes: u64,
    /// Memory entries overwritten before being read.
    pub memory_evictions: u64,
    /// Display refresh events.
    pub display_refreshes: u64,
    /// Values drained by displays.
    pub values_displayed: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_executed: 0,
            program_wraps: 0,
            div_by_zero: 0,
            bus_transfers: 0,
            memory_writes: 0,
            memory_evictions: 0,
            display_refreshes: 0,
            values_displayed: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "processing", "dataflow"];

impl SimStats {
    /// Average number of instructions executed per cycle (0 before the first cycle).
    pub fn instructions_per_cycle(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_executed as f64 / self.cycles as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an empty slice to
    /// print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();

        if want("summary") {
            println!("\n==========================================================");
            println!("PLATFORM SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_insts                {}", self.instructions_executed);
            println!("sim_ipc                  {:.4}", self.instructions_per_cycle());
            println!("----------------------------------------------------------");
        }
        if want("processing") {
            println!("PROCESSING");
            println!("  cpu.program_wraps      {}", self.program_wraps);
            println!("  cpu.div_by_zero        {}", self.div_by_zero);
            println!("----------------------------------------------------------");
        }
        if want("dataflow") {
            println!("DATA FLOW");
            println!("  bus.transfers          {}", self.bus_transfers);
            println!("  mem.writes             {}", self.memory_writes);
            println!("  mem.evictions          {}", self.memory_evictions);
            println!("  display.refreshes      {}", self.display_refreshes);
            println!("  display.values         {}", self.values_displayed);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
