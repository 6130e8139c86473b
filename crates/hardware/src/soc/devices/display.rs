//! Refresh-gated display.
//!
//! A display counts its `simulate()` calls and, every `refresh_rate` calls, drains its source
//! until the first invalid value. The drained values go to the run's `Observer` as one `Frame`.
//! Between refreshes the source is not touched.

use crate::config::DisplayConfig;
use crate::sim::context::SimContext;
use crate::sim::observer::Frame;
use crate::soc::arena::Handle;
use crate::soc::registry::Registry;
use crate::soc::traits::{Component, ComponentKind, Simulatable};

/// Consumer printing whatever its source produced since the last refresh.
#[derive(Clone, Debug)]
pub struct Display {
    label: String,
    refresh_rate: u64,
    call_counter: u64,
    source: Option<Handle>,
    source_label: Option<String>,
}

impl Default for Display {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default(), &Registry::new())
    }
}

impl Display {
    /// Creates an unbound display. `refresh_rate` is floored at 1.
    pub fn new(label: &str, refresh_rate: u64) -> Self {
        Self {
            label: label.to_owned(),
            refresh_rate: refresh_rate.max(1),
            call_counter: 0,
            source: None,
            source_label: None,
        }
    }

    /// Builds a display from its configuration, resolving `SOURCE` through `registry`.
    pub fn from_config(config: &DisplayConfig, registry: &Registry) -> Self {
        let mut display = Self::new(&config.label, config.refresh_rate);
        if let Some(source) = &config.source {
            display.source_label = Some(source.clone());
            display.source = registry.resolve(source);
            if display.source.is_none() {
                let label = &display.label;
                tracing::warn!(display = %label, source = %source, "source not found");
            }
        }
        display
    }

    /// Binds `handle` as the source; `label` is shown in frames.
    pub fn bind_handle(&mut self, handle: Handle, label: &str) {
        self.source = Some(handle);
        self.source_label = Some(label.to_owned());
    }

    /// Bound source handle, if any.
    pub const fn source(&self) -> Option<Handle> {
        self.source
    }

    /// Cycles between refreshes.
    pub const fn refresh_rate(&self) -> u64 {
        self.refresh_rate
    }

    /// Calls counted since the last refresh.
    pub const fn call_counter(&self) -> u64 {
        self.call_counter
    }
}

impl Simulatable for Display {
    fn simulate(&mut self, ctx: &mut SimContext<'_>) {
        let Some(source) = self.source else {
            return;
        };
        if !ctx.is_live(source) {
            tracing::warn!(display = %self.label, %source, "source was removed; unbinding");
            self.source = None;
            return;
        }

        self.call_counter += 1;
        if self.call_counter < self.refresh_rate {
            return;
        }
        self.call_counter = 0;

        let values: Vec<f64> = std::iter::from_fn(|| ctx.read(source).get()).collect();
        let stats = ctx.stats_mut();
        stats.display_refreshes += 1;
        stats.values_displayed += values.len() as u64;

        let frame = Frame {
            cycle: ctx.cycle(),
            display: self.label.clone(),
            source: self.source_label.clone().unwrap_or_default(),
            values,
        };
        ctx.emit(&frame);
    }

    fn describe(&self) -> String {
        format!(
            "DISPLAY label=\"{}\" refresh={} counter={} source=\"{}\"",
            self.label,
            self.refresh_rate,
            self.call_counter,
            self.source_label.as_deref().unwrap_or("No source")
        )
    }
}

impl Component for Display {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Display
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn set_label(&mut self, label: &str) {
        label.clone_into(&mut self.label);
    }

    fn as_display(&self) -> Option<&Display> {
        Some(self)
    }
}
