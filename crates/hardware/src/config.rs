//! Configuration system for platform components.
//!
//! This module defines the configuration structures used to parameterize each component kind.
//! It provides:
//! 1. **Defaults:** Baseline values applied when a key is absent.
//! 2. **Structures:** One config struct per kind (BUS, MEMORY, CPU, DISPLAY, PLATFORM).
//! 3. **Parsing:** `from_source` builds a config from `KEY: VALUE` entries, enforcing `TYPE`
//!    and the numeric floors.
//!
//! The same structures deserialize from JSON for programmatic construction.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::LoadError;
use crate::sim::loader::{ConfigEntry, ConfigSource};

/// Largest accepted memory `SIZE`.
///
/// Larger values in a component file are rejected as invalid numbers; `Memory` clamps to it.
pub const MAX_MEMORY_SIZE: usize = 1 << 20;

/// Default configuration constants.
///
/// These values apply when a key is not present in a component file.
mod defaults {
    /// Values pulled by a bus per cycle.
    pub const BUS_WIDTH: usize = 1;

    /// Ring buffer capacity of a memory. Also the floor for `SIZE`.
    pub const MEMORY_SIZE: usize = 1;

    /// Cycles between memory drains. Also the floor for `ACCESS`.
    pub const ACCESS_TIME: u64 = 1;

    /// Instruction steps attempted per cycle.
    pub const CPU_FREQUENCY: u32 = 1;

    /// Number of cores sharing a program. Also the floor for `N_CORES`.
    pub const CPU_CORES: u32 = 1;

    /// Cycles between display refreshes. Also the floor for `REFRESH`.
    pub const REFRESH_RATE: u64 = 1;

    /// Default labels, one per kind.
    pub const BUS_LABEL: &str = "BUS";
    pub const MEMORY_LABEL: &str = "MEMORY";
    pub const CPU_LABEL: &str = "CPU";
    pub const DISPLAY_LABEL: &str = "DISPLAY";
    pub const PLATFORM_LABEL: &str = "PLATFORM";
}

/// BUS configuration (`TYPE: BUS`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BusConfig {
    /// Component label (`LABEL`).
    #[serde(default = "BusConfig::default_label")]
    pub label: String,
    /// Maximum values pulled from the source per cycle (`WIDTH`).
    #[serde(default = "BusConfig::default_width")]
    pub width: usize,
    /// Label of the source component (`SOURCE`).
    #[serde(default)]
    pub source: Option<String>,
}

impl BusConfig {
    fn default_label() -> String {
        defaults::BUS_LABEL.to_owned()
    }

    fn default_width() -> usize {
        defaults::BUS_WIDTH
    }

    /// Parses a BUS description. A negative `WIDTH` is treated as 0.
    pub fn from_source(source: &mut dyn ConfigSource) -> Result<Self, LoadError> {
        let mut config = Self::default();
        while let Some(entry) = source.next_entry() {
            match entry.key.as_str() {
                "TYPE" => check_type("BUS", &entry)?,
                "LABEL" => config.label = entry.value,
                "WIDTH" => config.width = parse_number::<i64>(&entry)?.max(0) as usize,
                "SOURCE" => config.source = Some(entry.value),
                _ => warn_unknown(source.origin(), &entry),
            }
        }
        Ok(config)
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            label: Self::default_label(),
            width: Self::default_width(),
            source: None,
        }
    }
}

/// MEMORY configuration (`TYPE: MEMORY`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemoryConfig {
    /// Component label (`LABEL`).
    #[serde(default = "MemoryConfig::default_label")]
    pub label: String,
    /// Ring buffer capacity (`SIZE`), between 1 and [`MAX_MEMORY_SIZE`].
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,
    /// Drain period in cycles (`ACCESS`), at least 1.
    #[serde(default = "MemoryConfig::default_access_time")]
    pub access_time: u64,
    /// Label of the source component (`SOURCE`).
    #[serde(default)]
    pub source: Option<String>,
}

impl MemoryConfig {
    fn default_label() -> String {
        defaults::MEMORY_LABEL.to_owned()
    }

    fn default_size() -> usize {
        defaults::MEMORY_SIZE
    }

    fn default_access_time() -> u64 {
        defaults::ACCESS_TIME
    }

    /// Parses a MEMORY description, flooring `SIZE` and `ACCESS` at 1.
    ///
    /// A `SIZE` above [`MAX_MEMORY_SIZE`] is an `InvalidNumber` error.
    pub fn from_source(source: &mut dyn ConfigSource) -> Result<Self, LoadError> {
        let mut config = Self::default();
        while let Some(entry) = source.next_entry() {
            match entry.key.as_str() {
                "TYPE" => check_type("MEMORY", &entry)?,
                "LABEL" => config.label = entry.value,
                "SIZE" => {
                    let size = parse_number::<usize>(&entry)?;
                    if size > MAX_MEMORY_SIZE {
                        return Err(LoadError::InvalidNumber {
                            key: entry.key.clone(),
                            value: entry.value,
                        });
                    }
                    config.size = size.max(defaults::MEMORY_SIZE);
                }
                "ACCESS" => {
                    config.access_time =
                        parse_number::<i64>(&entry)?.max(defaults::ACCESS_TIME as i64) as u64;
                }
                "SOURCE" => config.source = Some(entry.value),
                _ => warn_unknown(source.origin(), &entry),
            }
        }
        Ok(config)
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            label: Self::default_label(),
            size: Self::default_size(),
            access_time: Self::default_access_time(),
            source: None,
        }
    }
}

/// CPU configuration (`TYPE: CPU`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CpuConfig {
    /// Component label (`LABEL`).
    #[serde(default = "CpuConfig::default_label")]
    pub label: String,
    /// Number of cores (`N_CORES`, alias `CORES`), at least 1.
    #[serde(default = "CpuConfig::default_cores")]
    pub n_cores: u32,
    /// Instruction steps attempted per cycle (`FREQUENCY`).
    #[serde(default = "CpuConfig::default_frequency")]
    pub frequency: u32,
    /// Path of the program file (`PROGRAM`).
    #[serde(default)]
    pub program: Option<String>,
}

impl CpuConfig {
    fn default_label() -> String {
        defaults::CPU_LABEL.to_owned()
    }

    fn default_cores() -> u32 {
        defaults::CPU_CORES
    }

    fn default_frequency() -> u32 {
        defaults::CPU_FREQUENCY
    }

    /// Parses a CPU description. `N_CORES` floors at 1, a negative `FREQUENCY` at 0.
    pub fn from_source(source: &mut dyn ConfigSource) -> Result<Self, LoadError> {
        let mut config = Self::default();
        while let Some(entry) = source.next_entry() {
            match entry.key.as_str() {
                "TYPE" => check_type("CPU", &entry)?,
                "LABEL" => config.label = entry.value,
                "N_CORES" | "CORES" => {
                    config.n_cores = parse_number::<i64>(&entry)?
                        .clamp(defaults::CPU_CORES as i64, u32::MAX as i64)
                        as u32;
                }
                "FREQUENCY" => {
                    config.frequency = parse_number::<i64>(&entry)?.clamp(0, u32::MAX as i64) as u32;
                }
                "PROGRAM" => config.program = Some(entry.value),
                _ => warn_unknown(source.origin(), &entry),
            }
        }
        Ok(config)
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            label: Self::default_label(),
            n_cores: Self::default_cores(),
            frequency: Self::default_frequency(),
            program: None,
        }
    }
}

/// DISPLAY configuration (`TYPE: DISPLAY`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Component label (`LABEL`, optional).
    #[serde(default = "DisplayConfig::default_label")]
    pub label: String,
    /// Cycles between refreshes (`REFRESH`), at least 1.
    #[serde(default = "DisplayConfig::default_refresh_rate")]
    pub refresh_rate: u64,
    /// Label of the source component (`SOURCE`).
    #[serde(default)]
    pub source: Option<String>,
}

impl DisplayConfig {
    fn default_label() -> String {
        defaults::DISPLAY_LABEL.to_owned()
    }

    fn default_refresh_rate() -> u64 {
        defaults::REFRESH_RATE
    }

    /// Parses a DISPLAY description, flooring `REFRESH` at 1.
    pub fn from_source(source: &mut dyn ConfigSource) -> Result<Self, LoadError> {
        let mut config = Self::default();
        while let Some(entry) = source.next_entry() {
            match entry.key.as_str() {
                "TYPE" => check_type("DISPLAY", &entry)?,
                "LABEL" => config.label = entry.value,
                "REFRESH" => {
                    config.refresh_rate =
                        parse_number::<i64>(&entry)?.max(defaults::REFRESH_RATE as i64) as u64;
                }
                "SOURCE" => config.source = Some(entry.value),
                _ => warn_unknown(source.origin(), &entry),
            }
        }
        Ok(config)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            label: Self::default_label(),
            refresh_rate: Self::default_refresh_rate(),
            source: None,
        }
    }
}

/// PLATFORM configuration (`TYPE: PLATFORM`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// Component label (`LABEL`).
    #[serde(default = "PlatformConfig::default_label")]
    pub label: String,
    /// Child component paths (`COMPONENT`, repeatable), in file order.
    #[serde(default)]
    pub components: Vec<String>,
}

impl PlatformConfig {
    fn default_label() -> String {
        defaults::PLATFORM_LABEL.to_owned()
    }

    /// Parses a PLATFORM description.
    pub fn from_source(source: &mut dyn ConfigSource) -> Result<Self, LoadError> {
        let mut config = Self::default();
        while let Some(entry) = source.next_entry() {
            match entry.key.as_str() {
                "TYPE" => check_type("PLATFORM", &entry)?,
                "LABEL" => config.label = entry.value,
                "COMPONENT" => config.components.push(entry.value),
                _ => warn_unknown(source.origin(), &entry),
            }
        }
        Ok(config)
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            label: Self::default_label(),
            components: Vec::new(),
        }
    }
}

fn check_type(expected: &'static str, entry: &ConfigEntry) -> Result<(), LoadError> {
    if entry.value == expected {
        Ok(())
    } else {
        Err(LoadError::TypeMismatch {
            expected,
            found: entry.value.clone(),
        })
    }
}

fn parse_number<T: FromStr>(entry: &ConfigEntry) -> Result<T, LoadError> {
    entry.value.parse().map_err(|_| LoadError::InvalidNumber {
        key: entry.key.clone(),
        value: entry.value.clone(),
    })
}

fn warn_unknown(origin: &str, entry: &ConfigEntry) {
    tracing::warn!(origin, key = %entry.key, line = entry.line, "unknown key ignored");
}
