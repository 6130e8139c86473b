//! Capability traits shared by every platform component.
//!
//! This module defines the contracts components are driven through. It provides:
//! 1. **Readable:** Pull-based `read()` used for every cross-component binding.
//! 2. **Simulatable:** `simulate()` advancing one cycle and `describe()` dumping state.
//! 3. **Component:** Identity (kind and label) plus optional casts to the concrete kinds.
//!
//! Components never hold references to each other. A consumer stores the `Handle` of its
//! source and reads it through the `SimContext` passed to `simulate()`.

use std::fmt;

use crate::common::DataValue;
use crate::core::Cpu;
use crate::sim::context::SimContext;
use crate::soc::devices::Display;
use crate::soc::interconnect::Bus;
use crate::soc::memory::Memory;
use crate::soc::platform::Platform;

/// Component able to hand out data to its consumers.
pub trait Readable {
    /// Pops the next available value, or returns the invalid sentinel when there is none.
    fn read(&mut self) -> DataValue;
}

/// Component advanced by the simulation loop.
pub trait Simulatable {
    /// Advances the component by exactly one cycle.
    fn simulate(&mut self, ctx: &mut SimContext<'_>);

    /// Returns a one-line human readable dump of the component state.
    fn describe(&self) -> String;
}

/// Kind tag used by platforms to order simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Instruction-stepping processor.
    Cpu,
    /// Cycle-gated circular store.
    Memory,
    /// Width-limited two-phase relay.
    Bus,
    /// Refresh-gated consumer.
    Display,
    /// Composite container.
    Platform,
    /// Component kind defined outside this crate.
    External,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cpu => "CPU",
            Self::Memory => "MEMORY",
            Self::Bus => "BUS",
            Self::Display => "DISPLAY",
            Self::Platform => "PLATFORM",
            Self::External => "EXTERNAL",
        };
        f.write_str(name)
    }
}

/// A simulated component owned by a `ComponentArena`.
///
/// Implementors supply identity and, when they produce data, a `Readable` view. The typed
/// casts let drivers and tests inspect concrete state without downcasting.
pub trait Component: Simulatable + fmt::Debug {
    /// Returns the kind tag of this component.
    fn kind(&self) -> ComponentKind;

    /// Returns the label used for source binding.
    fn label(&self) -> &str;

    /// Replaces the label. Registry entries are updated by `Simulator::rename`.
    fn set_label(&mut self, label: &str);

    /// Returns the readable view if this component produces data.
    fn as_readable_mut(&mut self) -> Option<&mut dyn Readable> {
        None
    }

    /// Returns a reference as `Bus` if this component is a bus.
    fn as_bus(&self) -> Option<&Bus> {
        None
    }
    /// Returns a reference as `Memory` if this component is a memory.
    fn as_memory(&self) -> Option<&Memory> {
        None
    }
    /// Returns a reference as `Cpu` if this component is a CPU.
    fn as_cpu(&self) -> Option<&Cpu> {
        None
    }
    /// Returns a reference as `Display` if this component is a display.
    fn as_display(&self) -> Option<&Display> {
        None
    }
    /// Returns a reference as `Platform` if this component is a platform.
    fn as_platform(&self) -> Option<&Platform> {
        None
    }
    /// Returns a mutable reference as `Memory` if this component is a memory.
    fn as_memory_mut(&mut self) -> Option<&mut Memory> {
        None
    }
    /// Returns a mutable reference as `Bus` if this component is a bus.
    fn as_bus_mut(&mut self) -> Option<&mut Bus> {
        None
    }
}
