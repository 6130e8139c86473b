//! Width-limited two-phase bus.
//!
//! A bus relays values from one source to its consumers with one cycle of latency. Each
//! `simulate()` performs:
//! 1. **Drain:** Every item pulled last cycle moves from `pending` to `ready`, in order.
//! 2. **Fill:** Up to `width` values are pulled from the source, one `read()` per value,
//!    stopping at the first invalid token.
//!
//! `read()` only ever serves `ready`, so an item pulled during cycle N is visible from cycle N+1.

use std::collections::VecDeque;
use std::fmt::Write;

use crate::common::DataValue;
use crate::config::BusConfig;
use crate::sim::context::SimContext;
use crate::soc::arena::Handle;
use crate::soc::registry::Registry;
use crate::soc::traits::{Component, ComponentKind, Readable, Simulatable};

/// Two-phase relay between a source and its consumers.
#[derive(Clone, Debug)]
pub struct Bus {
    label: String,
    width: usize,
    source: Option<Handle>,
    source_label: Option<String>,
    pending: VecDeque<DataValue>,
    ready: VecDeque<DataValue>,
    read_count: u64,
}

impl Default for Bus {
    fn default() -> Self {
        Self::from_config(&BusConfig::default(), &Registry::new())
    }
}

impl Bus {
    /// Creates an unbound bus of the given width.
    pub fn new(label: &str, width: usize) -> Self {
        Self {
            label: label.to_owned(),
            width,
            source: None,
            source_label: None,
            pending: VecDeque::new(),
            ready: VecDeque::new(),
            read_count: 0,
        }
    }

    /// Builds a bus from its configuration, resolving `SOURCE` through `registry`.
    pub fn from_config(config: &BusConfig, registry: &Registry) -> Self {
        let mut bus = Self::new(&config.label, config.width);
        if let Some(source) = &config.source {
            let _ = bus.bind_source(source, registry);
        }
        bus
    }

    /// Binds the source registered under `label`.
    ///
    /// Binding to the bus's own label is rejected and leaves the bus unbound. An unknown label
    /// also leaves the bus unbound. Returns `true` if a source is now bound.
    pub fn bind_source(&mut self, label: &str, registry: &Registry) -> bool {
        self.source = None;
        self.source_label = None;
        if label == self.label {
            tracing::warn!(bus = %self.label, "bus cannot bind to itself as source");
            return false;
        }
        self.source_label = Some(label.to_owned());
        self.source = registry.resolve(label);
        if self.source.is_none() {
            tracing::warn!(bus = %self.label, source = label, "source not found");
        }
        self.source.is_some()
    }

    /// Binds `handle` directly as the source; `label` is kept for diagnostics.
    pub fn bind_handle(&mut self, handle: Handle, label: &str) {
        self.source = Some(handle);
        self.source_label = Some(label.to_owned());
    }

    /// Removes the source binding.
    pub fn unbind(&mut self) {
        self.source = None;
        self.source_label = None;
    }

    /// Bound source handle, if any.
    pub const fn source(&self) -> Option<Handle> {
        self.source
    }

    /// Label of the bound source, or `"No source"`.
    pub fn source_label(&self) -> &str {
        match (&self.source, &self.source_label) {
            (Some(_), Some(label)) => label,
            _ => "No source",
        }
    }

    /// Maximum values pulled per cycle.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Changes the per-cycle pull limit.
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// Values visible to consumers, oldest first.
    pub fn ready(&self) -> impl ExactSizeIterator<Item = &DataValue> + '_ {
        self.ready.iter()
    }

    /// Values pulled this cycle, oldest first.
    pub fn pending(&self) -> impl ExactSizeIterator<Item = &DataValue> + '_ {
        self.pending.iter()
    }

    /// Successful reads served so far.
    pub const fn read_count(&self) -> u64 {
        self.read_count
    }
}

impl Readable for Bus {
    fn read(&mut self) -> DataValue {
        match self.ready.pop_front() {
            Some(value) => {
                self.read_count += 1;
                value
            }
            None => DataValue::invalid(),
        }
    }
}

impl Simulatable for Bus {
    fn simulate(&mut self, ctx: &mut SimContext<'_>) {
        self.ready.extend(self.pending.drain(..));

        let Some(source) = self.source else {
            return;
        };
        let mut pulled = 0u64;
        for _ in 0..self.width {
            let data = ctx.read(source);
            if !data.is_valid() {
                break;
            }
            self.pending.push_back(data);
            pulled += 1;
        }
        ctx.stats_mut().bus_transfers += pulled;
        tracing::trace!(bus = %self.label, pulled, ready = self.ready.len(), "bus cycle");
    }

    fn describe(&self) -> String {
        let mut out = format!(
            "BUS label=\"{}\" width={} source=\"{}\" ready={} pending={} reads={}",
            self.label,
            self.width,
            self.source_label(),
            self.ready.len(),
            self.pending.len(),
            self.read_count
        );
        out.push_str(" | ready:");
        for v in &self.ready {
            let _ = write!(out, " {}", v.value);
        }
        out.push_str(" | pending:");
        for v in &self.pending {
            let _ = write!(out, " {}", v.value);
        }
        out
    }
}

impl Component for Bus {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Bus
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

    fn as_bus(&self) -> Option<&Bus> {
        Some(self)
    }

    fn as_bus_mut(&mut self) -> Option<&mut Bus> {
        Some(self)
    }
}
