//! Data tokens exchanged between components.
//!
//! This module defines the unit of data flow in the simulated platform. It provides:
//! 1. **Payload:** A 64-bit floating point value carried from producer to consumer.
//! 2. **Validity:** A flag marking whether the token carries data at all.
//! 3. **Sentinel:** The invalid token, which every consumer treats as "no more data this cycle".

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value travelling between components, tagged with its validity.
///
/// An invalid `DataValue` is never meaningful data: a consumer that reads one
/// must stop pulling from that source for the current cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    /// Carried payload; zero for invalid tokens.
    pub value: f64,
    /// `true` when `value` is real data.
    pub valid: bool,
}

impl DataValue {
    /// Creates a valid token carrying `value`.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self { value, valid: true }
    }

    /// Returns the invalid sentinel.
    #[inline]
    pub const fn invalid() -> Self {
        Self {
            value: 0.0,
            valid: false,
        }
    }

    /// Returns `true` if this token carries data.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the payload of a valid token, or `None` for the sentinel.
    #[inline]
    pub const fn get(&self) -> Option<f64> {
        if self.valid { Some(self.value) } else { None }
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "{}", self.value)
        } else {
            write!(f, "<invalid>")
        }
    }
}
