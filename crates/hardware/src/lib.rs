//! Cycle-stepped platform simulator library.
//!
//! This crate models a toy hardware platform as a graph of components advancing in lockstep
//! cycles and exchanging `DataValue` tokens. It contains:
//! 1. **Core:** CPUs stepping a cyclic arithmetic program across round-robin cores.
//! 2. **ISA:** The four-operation instruction set and program text decoding.
//! 3. **SoC:** Buses, memories, displays and nested platforms, owned by a generational arena
//!    and bound to each other by label through a run-scoped registry.
//! 4. **Simulation:** Configuration loading, the `Simulator` run scope, display observers and
//!    statistics collection.

/// Common types (data tokens, errors).
pub mod common;
/// Per-kind component configuration with defaults.
pub mod config;
/// CPU, program and output register.
pub mod core;
/// Instruction set and program decoding.
pub mod isa;
/// Simulator, context, loader and observers.
pub mod sim;
/// Components, arena and registry.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Value/validity token exchanged between components.
pub use crate::common::DataValue;
/// Errors reported while loading components.
pub use crate::common::LoadError;
/// Run scope; load a platform with `Simulator::load_platform` and drive it with `run`.
pub use crate::sim::Simulator;
/// Handle to a component owned by a `Simulator`.
pub use crate::soc::Handle;
