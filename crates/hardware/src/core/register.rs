//! Output FIFO of computed results.

use std::collections::VecDeque;

use crate::common::DataValue;

/// FIFO of results waiting to be read by consumers.
#[derive(Clone, Debug, Default)]
pub struct Register {
    fifo: VecDeque<DataValue>,
}

impl Register {
    /// Creates an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result.
    pub fn push(&mut self, value: DataValue) {
        self.fifo.push_back(value);
    }

    /// Pops the oldest result, or returns the invalid sentinel when empty.
    pub fn pop(&mut self) -> DataValue {
        self.fifo.pop_front().unwrap_or_else(DataValue::invalid)
    }

    /// Oldest result, if any.
    pub fn peek(&self) -> Option<&DataValue> {
        self.fifo.front()
    }

    /// Number of buffered results.
    pub fn len(&self) -> usize {
        self.fifo.len()
    }

    /// Returns `true` if no result is buffered.
    pub fn is_empty(&self) -> bool {
        self.fifo.is_empty()
    }

    /// Discards every buffered result.
    pub fn clear(&mut self) {
        self.fifo.clear();
    }

    /// Buffered results, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &DataValue> + '_ {
        self.fifo.iter()
    }
}
