//! Cycle-gated circular memory.
//!
//! A memory stores values pulled from its source in a fixed-capacity ring. It provides:
//! 1. **Buffer:** `RingBuffer` storage with overwrite-on-full semantics.
//! 2. **Gating:** The source is drained only on cycles where `cycle_counter % access_time == 0`
//!    (every cycle when `access_time <= 1`). A firing cycle pulls until the first invalid value.
//! 3. **Lazy binding:** A `SOURCE` label unknown at load time is re-resolved every cycle until
//!    it succeeds; a bound handle that goes stale is dropped and resolution resumes.

/// Ring buffer storage.
pub mod buffer;

use std::fmt::Write;

use self::buffer::RingBuffer;
use crate::common::DataValue;
use crate::config::{MAX_MEMORY_SIZE, MemoryConfig};
use crate::sim::context::SimContext;
use crate::soc::arena::Handle;
use crate::soc::registry::Registry;
use crate::soc::traits::{Component, ComponentKind, Readable, Simulatable};

/// Circular store fed from a source every `access_time` cycles.
#[derive(Clone, Debug)]
pub struct Memory {
    label: String,
    buffer: RingBuffer<DataValue>,
    access_time: u64,
    cycle_counter: u64,
    source: Option<Handle>,
    source_label: Option<String>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::from_config(&MemoryConfig::default(), &Registry::new())
    }
}

impl Memory {
    /// Creates an unbound memory. `size` and `access_time` are floored at 1, and `size` is
    /// capped at [`MAX_MEMORY_SIZE`].
    pub fn new(label: &str, size: usize, access_time: u64) -> Self {
        Self {
            label: label.to_owned(),
            buffer: RingBuffer::new(size.min(MAX_MEMORY_SIZE)),
            access_time: access_time.max(1),
            cycle_counter: 0,
            source: None,
            source_label: None,
        }
    }

    /// Builds a memory from its configuration.
    ///
    /// The `SOURCE` label is resolved immediately when possible and otherwise kept for lazy
    /// resolution during `simulate()`.
    pub fn from_config(config: &MemoryConfig, registry: &Registry) -> Self {
        let mut memory = Self::new(&config.label, config.size, config.access_time);
        if let Some(source) = &config.source {
            let _ = memory.bind_source(source, registry);
        }
        memory
    }

    /// Binds the source registered under `label`.
    ///
    /// Self-binding is rejected and the label is not remembered. An unknown label is remembered
    /// and retried every cycle. Returns `true` if a source is bound now.
    pub fn bind_source(&mut self, label: &str, registry: &Registry) -> bool {
        self.source = None;
        self.source_label = None;
        if label == self.label {
            tracing::warn!(memory = %self.label, "memory cannot bind to itself as source");
            return false;
        }
        self.source_label = Some(label.to_owned());
        self.source = registry.resolve(label);
        if self.source.is_none() {
            tracing::warn!(
                memory = %self.label,
                source = label,
                "source not registered yet; will retry every cycle"
            );
        }
        self.source.is_some()
    }

    /// Bound source handle, if any.
    pub const fn source(&self) -> Option<Handle> {
        self.source
    }

    /// Label the memory binds to, whether or not it is resolved.
    pub fn source_label(&self) -> Option<&str> {
        self.source_label.as_deref()
    }

    /// Resizes the ring, keeping the newest entries. A size of 0 is raised to 1 and sizes
    /// above [`MAX_MEMORY_SIZE`] are capped.
    pub fn set_size(&mut self, size: usize) {
        self.buffer.resize(size.min(MAX_MEMORY_SIZE));
    }

    /// Changes the drain period. A period of 0 is raised to 1.
    pub fn set_access_time(&mut self, access_time: u64) {
        self.access_time = access_time.max(1);
    }

    /// Ring capacity.
    pub fn size(&self) -> usize {
        self.buffer.capacity()
    }

    /// Drain period in cycles.
    pub const fn access_time(&self) -> u64 {
        self.access_time
    }

    /// Cycles simulated so far.
    pub const fn cycle_counter(&self) -> u64 {
        self.cycle_counter
    }

    /// Number of stored values.
    pub const fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if nothing is stored.
    pub const fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Stored values, oldest first, without consuming them.
    pub fn contents(&self) -> Vec<DataValue> {
        self.buffer.iter().collect()
    }

    /// Reads every stored value, oldest first, leaving the memory empty.
    pub fn drain(&mut self) -> Vec<DataValue> {
        std::iter::from_fn(|| self.buffer.pop()).collect()
    }

    fn refresh_binding(&mut self, ctx: &SimContext<'_>) {
        if let Some(handle) = self.source.filter(|h| !ctx.is_live(*h)) {
            tracing::warn!(memory = %self.label, %handle, "source was removed; unbinding");
            self.source = None;
        }
        if self.source.is_some() {
            return;
        }
        if let Some(label) = &self.source_label {
            self.source = ctx.resolve(label);
            if let Some(handle) = self.source {
                tracing::debug!(memory = %self.label, source = %label, %handle, "source resolved");
            }
        }
    }
}

impl Readable for Memory {
    fn read(&mut self) -> DataValue {
        self.buffer.pop().unwrap_or_else(DataValue::invalid)
    }
}

impl Simulatable for Memory {
    fn simulate(&mut self, ctx: &mut SimContext<'_>) {
        self.cycle_counter += 1;
        self.refresh_binding(ctx);

        let Some(source) = self.source else {
            return;
        };
        if self.access_time > 1 && self.cycle_counter % self.access_time != 0 {
            return;
        }

        let (mut writes, mut evictions) = (0u64, 0u64);
        loop {
            let data = ctx.read(source);
            if !data.is_valid() {
                break;
            }
            writes += 1;
            if self.buffer.push(data).is_some() {
                evictions += 1;
            }
        }
        let stats = ctx.stats_mut();
        stats.memory_writes += writes;
        stats.memory_evictions += evictions;
        tracing::trace!(memory = %self.label, writes, evictions, stored = self.buffer.len(), "memory drain");
    }

    fn describe(&self) -> String {
        let mut out = format!(
            "MEMORY label=\"{}\" size={} access={} source=\"{}\" stored={} head={} tail={} |",
            self.label,
            self.buffer.capacity(),
            self.access_time,
            self.source_label.as_deref().unwrap_or("No source"),
            self.buffer.len(),
            self.buffer.head(),
            self.buffer.tail()
        );
        for v in self.buffer.iter() {
            let _ = write!(out, " {}", v.value);
        }
        out
    }
}

impl Component for Memory {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Memory
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

    fn as_memory(&self) -> Option<&Memory> {
        Some(self)
    }

    fn as_memory_mut(&mut self) -> Option<&mut Memory> {
        Some(self)
    }
}
