//! Simulation driver and platform loading.
//!
//! Provides the run scope (`Simulator`), the per-cycle `SimContext` handed to components,
//! configuration loading, and display output sinks.

/// Per-cycle view handed to components.
pub mod context;

/// Configuration sources, providers and the platform loader.
pub mod loader;

/// Display frames and their observers.
pub mod observer;

/// Run scope owning all components.
pub mod simulator;

pub use context::SimContext;
pub use loader::{
    ConfigProvider, ConfigSource, FsProvider, KeyValueSource, Loader, MAX_PLATFORM_DEPTH,
    MemoryProvider,
};
pub use observer::{Frame, FrameRecorder, Observer, TraceObserver};
pub use simulator::Simulator;
