//! Simulator: owns every component of one run together with its registry.
//!
//! The simulator is the run scope. It provides:
//! 1. **Ownership:** A `ComponentArena` holding all components; handles go stale on removal.
//! 2. **Naming:** The run's `Registry`, kept consistent on removal and rename.
//! 3. **Driving:** `tick()` simulates every root component once, in insertion order.
//! 4. **Reporting:** Statistics, the display `Observer`, and a rendered component tree.

use std::fmt::{self, Write};

use crate::common::{DataValue, LoadError};
use crate::sim::context::SimContext;
use crate::sim::loader::{ConfigProvider, Loader};
use crate::sim::observer::{Observer, TraceObserver};
use crate::soc::arena::{ComponentArena, Handle};
use crate::soc::registry::Registry;
use crate::soc::traits::Component;
use crate::stats::SimStats;

/// Top-level simulation run.
pub struct Simulator {
    components: ComponentArena,
    registry: Registry,
    observer: Box<dyn Observer>,
    stats: SimStats,
    roots: Vec<Handle>,
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("components", &self.components)
            .field("registry", &self.registry)
            .field("roots", &self.roots)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    /// Creates an empty run whose display frames are logged.
    pub fn new() -> Self {
        Self::with_observer(TraceObserver)
    }

    /// Creates an empty run sending display frames to `observer`.
    pub fn with_observer(observer: impl Observer + 'static) -> Self {
        Self {
            components: ComponentArena::new(),
            registry: Registry::new(),
            observer: Box::new(observer),
            stats: SimStats::default(),
            roots: Vec::new(),
        }
    }

    /// Takes ownership of `component` without registering or scheduling it.
    pub fn insert(&mut self, component: Box<dyn Component>) -> Handle {
        self.components.insert(component)
    }

    /// Registers the component behind `handle` under its current label.
    ///
    /// Returns `false` if the handle is stale or the label was already taken (the entry is
    /// still added; lookups return the earlier one).
    pub fn register(&mut self, handle: Handle) -> bool {
        let Some(label) = self.components.get(handle).map(|c| c.label().to_owned()) else {
            return false;
        };
        self.registry.register(&label, handle)
    }

    /// Removes a component, invalidating `handle` and every registry entry pointing at it.
    ///
    /// Platforms still listing the handle skip it from then on.
    pub fn remove(&mut self, handle: Handle) -> Option<Box<dyn Component>> {
        let component = self.components.remove(handle)?;
        let entries = self.registry.deregister(handle);
        self.roots.retain(|h| *h != handle);
        tracing::debug!(%handle, label = component.label(), entries, "component removed");
        Some(component)
    }

    /// Renames a component and its registry entries. Returns `false` for a stale handle.
    pub fn rename(&mut self, handle: Handle, label: &str) -> bool {
        let Some(component) = self.components.get_mut(handle) else {
            return false;
        };
        component.set_label(label);
        self.registry.rename(handle, label);
        true
    }

    /// Resolves `label` to the first registered component that is still live.
    pub fn resolve(&self, label: &str) -> Option<Handle> {
        self.registry
            .resolve_all(label)
            .find(|h| self.components.contains(*h))
    }

    /// Component behind `handle`, if live.
    pub fn component(&self, handle: Handle) -> Option<&dyn Component> {
        self.components.get(handle)
    }

    /// Mutable component behind `handle`, if live.
    pub fn component_mut(&mut self, handle: Handle) -> Option<&mut dyn Component> {
        self.components.get_mut(handle)
    }

    /// Reads one value from `handle` as a consumer outside the simulation would.
    pub fn read(&mut self, handle: Handle) -> DataValue {
        self.components
            .get_mut(handle)
            .and_then(|c| c.as_readable_mut())
            .map_or_else(DataValue::invalid, |r| r.read())
    }

    /// Loads a platform tree from `path` and schedules it as a root.
    ///
    /// # Errors
    ///
    /// Returns the error of the top-level platform file. Failing children are logged and
    /// skipped instead.
    pub fn load_platform(
        &mut self,
        provider: &dyn ConfigProvider,
        path: &str,
    ) -> Result<Handle, LoadError> {
        let platform =
            Loader::new(provider, &mut self.components, &mut self.registry).load_platform(path)?;
        let handle = self.components.insert(Box::new(platform));
        self.roots.push(handle);
        Ok(handle)
    }

    /// Schedules `handle` to be simulated by every `tick()`.
    pub fn add_root(&mut self, handle: Handle) {
        if !self.roots.contains(&handle) {
            self.roots.push(handle);
        }
    }

    /// Root components in simulation order.
    pub fn roots(&self) -> &[Handle] {
        &self.roots
    }

    /// Advances the run by one cycle.
    pub fn tick(&mut self) {
        self.stats.cycles += 1;
        let cycle = self.stats.cycles;
        let mut ctx = SimContext::new(
            &mut self.components,
            &self.registry,
            self.observer.as_mut(),
            &mut self.stats,
            cycle,
        );
        for &root in &self.roots {
            if !ctx.simulate_child(root) {
                tracing::warn!(%root, "root component unavailable");
            }
        }
        tracing::trace!(cycle, "cycle complete");
    }

    /// Advances the run by `cycles` cycles.
    pub fn run(&mut self, cycles: u64) {
        tracing::info!(cycles, "running simulation");
        for _ in 0..cycles {
            self.tick();
        }
    }

    /// Statistics collected so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// The run's registry.
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// All live components with their handles.
    pub fn components(&self) -> impl Iterator<Item = (Handle, &dyn Component)> + '_ {
        self.components.iter()
    }

    /// Renders every root and its descendants, one `describe()` line per component.
    pub fn describe_tree(&self) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            self.describe_into(&mut out, root, 0);
        }
        out
    }

    fn describe_into(&self, out: &mut String, handle: Handle, depth: usize) {
        let indent = "  ".repeat(depth);
        let Some(component) = self.components.get(handle) else {
            let _ = writeln!(out, "{indent}<removed {handle}>");
            return;
        };
        let _ = writeln!(out, "{indent}{}", component.describe());
        if let Some(platform) = component.as_platform() {
            for child in platform.children() {
                self.describe_into(out, child, depth + 1);
            }
        }
    }
}
