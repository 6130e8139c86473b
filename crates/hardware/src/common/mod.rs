//! Common types used throughout the platform simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Data Tokens:** The `DataValue` value/validity pair, the sole unit of data flow.
//! 2. **Error Handling:** Load errors and arithmetic faults.

/// Data token definitions.
pub mod data;

/// Error types.
pub mod error;

pub use data::DataValue;
pub use error::{ArithmeticFault, LoadError};
