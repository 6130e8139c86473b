//! Display output sinks.
//!
//! A display drains its source on every refresh and hands the result to an `Observer` as a
//! `Frame`. Two observers are provided:
//! 1. **`TraceObserver`:** Logs each frame through `tracing` (the default).
//! 2. **`FrameRecorder`:** Keeps frames in memory for inspection by drivers and tests.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

/// Values drained by one display refresh.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    /// Cycle number (1-based) in which the refresh happened.
    pub cycle: u64,
    /// Label of the display.
    pub display: String,
    /// Label of the display's source.
    pub source: String,
    /// Valid values read, oldest first.
    pub values: Vec<f64>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] Source: {} ->", self.display, self.source)?;
        for v in &self.values {
            write!(f, " {v}")?;
        }
        Ok(())
    }
}

/// Receiver of display frames.
pub trait Observer {
    /// Called once per display refresh.
    fn on_frame(&mut self, frame: &Frame);
}

/// Observer logging frames at `info` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceObserver;

impl Observer for TraceObserver {
    fn on_frame(&mut self, frame: &Frame) {
        tracing::info!(target: "plasim::display", cycle = frame.cycle, "{frame}");
    }
}

/// Observer collecting frames in memory.
///
/// Clones share the same storage, so a driver can keep one clone while the simulator owns
/// another.
#[derive(Clone, Debug, Default)]
pub struct FrameRecorder {
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl FrameRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all frames recorded so far.
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.borrow().clone()
    }

    /// Returns all displayed values, in display order, across frames.
    pub fn values(&self) -> Vec<f64> {
        self.frames
            .borrow()
            .iter()
            .flat_map(|f| f.values.iter().copied())
            .collect()
    }

    /// Number of frames recorded.
    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Returns `true` if no frame was recorded.
    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }
}

impl Observer for FrameRecorder {
    fn on_frame(&mut self, frame: &Frame) {
        self.frames.borrow_mut().push(frame.clone());
    }
}
