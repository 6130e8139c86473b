//! Platform: the composite container driving a group of components.
//!
//! A platform owns its children through handles into the run's `ComponentArena`, grouped by
//! kind. Each cycle it simulates them in a fixed order:
//! 1. **CPUs**, so that results computed this cycle are readable downstream.
//! 2. **Memories**, draining whatever their sources expose before those sources run.
//! 3. **Buses**, promoting last cycle's pending items and pulling new ones.
//! 4. **Displays**, observing the state left by the producers.
//! 5. **Nested platforms**, then components of external kinds.
//!
//! This order is part of the contract: a consumer simulated after its source sees the data the
//! source produced earlier in the same cycle.

use crate::common::DataValue;
use crate::sim::context::SimContext;
use crate::soc::arena::Handle;
use crate::soc::traits::{Component, ComponentKind, Readable, Simulatable};

/// Composite component owning CPUs, memories, buses, displays and nested platforms.
#[derive(Clone, Debug, Default)]
pub struct Platform {
    label: String,
    cpus: Vec<Handle>,
    memories: Vec<Handle>,
    buses: Vec<Handle>,
    displays: Vec<Handle>,
    platforms: Vec<Handle>,
    externals: Vec<Handle>,
    registered: Vec<Handle>,
}

impl Platform {
    /// Creates an empty platform.
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            ..Self::default()
        }
    }

    /// Adds a child to the list matching `kind`.
    pub fn attach(&mut self, kind: ComponentKind, handle: Handle) {
        let list = match kind {
            ComponentKind::Cpu => &mut self.cpus,
            ComponentKind::Memory => &mut self.memories,
            ComponentKind::Bus => &mut self.buses,
            ComponentKind::Display => &mut self.displays,
            ComponentKind::Platform => &mut self.platforms,
            ComponentKind::External => &mut self.externals,
        };
        list.push(handle);
    }

    /// Removes `handle` from every child list. Returns `true` if it was a child.
    pub fn detach(&mut self, handle: Handle) -> bool {
        let mut found = false;
        for list in [
            &mut self.cpus,
            &mut self.memories,
            &mut self.buses,
            &mut self.displays,
            &mut self.platforms,
            &mut self.externals,
        ] {
            let before = list.len();
            list.retain(|h| *h != handle);
            found |= list.len() != before;
        }
        self.registered.retain(|h| *h != handle);
        found
    }

    /// Records that `handle` was registered in the run registry on behalf of this platform.
    pub fn record_registration(&mut self, handle: Handle) {
        self.registered.push(handle);
    }

    /// Handles this platform registered, in registration order.
    pub fn registered(&self) -> &[Handle] {
        &self.registered
    }

    /// Child CPUs in simulation order.
    pub fn cpus(&self) -> &[Handle] {
        &self.cpus
    }

    /// Child memories in simulation order.
    pub fn memories(&self) -> &[Handle] {
        &self.memories
    }

    /// Child buses in simulation order.
    pub fn buses(&self) -> &[Handle] {
        &self.buses
    }

    /// Child displays in simulation order.
    pub fn displays(&self) -> &[Handle] {
        &self.displays
    }

    /// Nested platforms in simulation order.
    pub fn platforms(&self) -> &[Handle] {
        &self.platforms
    }

    /// Children of external kinds in simulation order.
    pub fn externals(&self) -> &[Handle] {
        &self.externals
    }

    /// All children in the order they are simulated.
    pub fn children(&self) -> impl Iterator<Item = Handle> + '_ {
        self.cpus
            .iter()
            .chain(&self.memories)
            .chain(&self.buses)
            .chain(&self.displays)
            .chain(&self.platforms)
            .chain(&self.externals)
            .copied()
    }
}

impl Readable for Platform {
    /// Platforms produce no data of their own.
    fn read(&mut self) -> DataValue {
        DataValue::invalid()
    }
}

impl Simulatable for Platform {
    fn simulate(&mut self, ctx: &mut SimContext<'_>) {
        for handle in self.children() {
            let _ = ctx.simulate_child(handle);
        }
    }

    fn describe(&self) -> String {
        format!(
            "PLATFORM label=\"{}\" CPUs={} Memories={} Buses={} Displays={} Subplatforms={}",
            self.label,
            self.cpus.len(),
            self.memories.len(),
            self.buses.len(),
            self.displays.len(),
            self.platforms.len()
        )
    }
}

impl Component for Platform {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Platform
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

    fn as_platform(&self) -> Option<&Platform> {
        Some(self)
    }
}
