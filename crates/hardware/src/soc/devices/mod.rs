//! Output devices.
//!
//! Devices are pure consumers: they bind to a source but are never registered as one.

/// Refresh-gated display.
pub mod display;

pub use display::Display;
