//! Per-cycle view of the simulation handed to components.
//!
//! A component being simulated has been checked out of the arena, so it cannot alias itself.
//! Through the `SimContext` it can:
//! 1. **Read:** Pull from a source handle (invalid if the handle is stale or checked out).
//! 2. **Resolve:** Look up a label among live registry entries (lazy binding).
//! 3. **Delegate:** Simulate child components (used by platforms).
//! 4. **Report:** Emit display frames and update statistics.

use crate::common::DataValue;
use crate::sim::observer::{Frame, Observer};
use crate::soc::arena::{ComponentArena, Handle};
use crate::soc::registry::Registry;
use crate::stats::SimStats;

/// Mutable simulation state visible to a component during `simulate()`.
pub struct SimContext<'a> {
    components: &'a mut ComponentArena,
    registry: &'a Registry,
    observer: &'a mut dyn Observer,
    stats: &'a mut SimStats,
    cycle: u64,
}

impl std::fmt::Debug for SimContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimContext")
            .field("components", &self.components)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl<'a> SimContext<'a> {
    /// Builds a context for cycle number `cycle` (1-based).
    pub fn new(
        components: &'a mut ComponentArena,
        registry: &'a Registry,
        observer: &'a mut dyn Observer,
        stats: &'a mut SimStats,
        cycle: u64,
    ) -> Self {
        Self {
            components,
            registry,
            observer,
            stats,
            cycle,
        }
    }

    /// Current cycle number (1-based).
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Reads one value from `source`.
    ///
    /// Returns the invalid sentinel if the handle is stale, the component is not readable, or
    /// it is the component currently being simulated.
    pub fn read(&mut self, source: Handle) -> DataValue {
        self.components
            .get_mut(source)
            .and_then(|c| c.as_readable_mut())
            .map_or_else(DataValue::invalid, |r| r.read())
    }

    /// Resolves `label` to the first registered handle that is still live.
    pub fn resolve(&self, label: &str) -> Option<Handle> {
        self.registry
            .resolve_all(label)
            .find(|h| self.components.contains(*h))
    }

    /// Returns `true` while `handle` refers to a component that has not been removed.
    pub fn is_live(&self, handle: Handle) -> bool {
        self.components.contains(handle)
    }

    /// Runs one cycle of the child component behind `handle`.
    ///
    /// Returns `false` if the handle is stale or the component is already being simulated.
    pub fn simulate_child(&mut self, handle: Handle) -> bool {
        let Some(mut component) = self.components.checkout(handle) else {
            tracing::trace!(%handle, "skipping unavailable child");
            return false;
        };
        component.simulate(self);
        self.components.restore(handle, component);
        true
    }

    /// Hands a display frame to the observer.
    pub fn emit(&mut self, frame: &Frame) {
        self.observer.on_frame(frame);
    }

    /// Statistics for the current run.
    pub fn stats_mut(&mut self) -> &mut SimStats {
        &mut *self.stats
    }
}
