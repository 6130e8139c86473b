//! Load and arithmetic error definitions.
//!
//! This module defines the failures the simulator reports to its callers. It provides:
//! 1. **Load Errors:** Unreadable files, `TYPE` mismatches, malformed fields and platform
//!    include cycles, returned by every component loader.
//! 2. **Arithmetic Faults:** Runtime faults raised by instruction execution; the CPU reports
//!    them and substitutes a neutral result instead of stopping the run.
//!
//! Source resolution failures and self-binding are not errors: the component stays unbound
//! and a diagnostic is logged.

use std::io;

use thiserror::Error;

/// Failure while loading a component from its configuration.
///
/// A `LoadError` aborts only the load that produced it. A platform loading its children
/// logs the error and skips that child.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The configuration or program file could not be read.
    #[error("could not open '{path}': {source}")]
    Io {
        /// Path as given in the configuration.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// No file with this path is known to the provider.
    #[error("no such configuration file '{path}'")]
    MissingFile {
        /// Path as given in the configuration.
        path: String,
    },

    /// The `TYPE` key names a different component kind than the loader expects.
    #[error("TYPE must be '{expected}', found '{found}' instead")]
    TypeMismatch {
        /// Kind the loader handles (e.g. `"BUS"`).
        expected: &'static str,
        /// Value found in the file.
        found: String,
    },

    /// A numeric key holds a value that does not parse.
    #[error("invalid value '{value}' for key '{key}'")]
    InvalidNumber {
        /// Offending key.
        key: String,
        /// Raw value text.
        value: String,
    },

    /// A program line is not an `OPCODE OPERAND_L OPERAND_R` triple.
    #[error("malformed instruction on line {line}: '{text}'")]
    MalformedInstruction {
        /// One-based line number in the program file.
        line: usize,
        /// Raw line text.
        text: String,
    },

    /// A platform includes itself, directly or through nested platforms.
    #[error("platform '{path}' includes itself")]
    RecursiveInclude {
        /// Path of the platform that is already being loaded.
        path: String,
    },

    /// Platforms are nested deeper than the loader allows.
    #[error("platform '{path}' nested more than {limit} levels deep")]
    NestingTooDeep {
        /// Path of the platform that would exceed the limit.
        path: String,
        /// Maximum nesting depth.
        limit: usize,
    },
}

/// Fault raised while computing an instruction result.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ArithmeticFault {
    /// Division with a zero right operand.
    #[error("division by zero ({dividend} / 0)")]
    DivisionByZero {
        /// Left operand of the division.
        dividend: f64,
    },
}
