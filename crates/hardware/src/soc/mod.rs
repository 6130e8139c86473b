//! Platform Components.
//!
//! This module organizes the components a platform is built from, the arena that owns them,
//! and the registry used to bind consumers to their sources by label.

/// Generational component arena and handles.
pub mod arena;

/// Output devices (displays).
pub mod devices;

/// Two-phase bus relay.
pub mod interconnect;

/// Cycle-gated circular memory.
pub mod memory;

/// Composite platform container.
pub mod platform;

/// Label to handle registry.
pub mod registry;

/// Capability traits shared by all components.
pub mod traits;

pub use arena::{ComponentArena, Handle};
pub use devices::Display;
pub use interconnect::Bus;
pub use memory::Memory;
pub use platform::Platform;
pub use registry::Registry;
pub use traits::{Component, ComponentKind, Readable, Simulatable};
