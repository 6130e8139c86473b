//! Configuration sources and platform loading.
//!
//! This module turns component description files into live components. It performs:
//! 1. **Entry parsing:** `KEY: VALUE` lines become `ConfigEntry` items of a `ConfigSource`.
//! 2. **File access:** A `ConfigProvider` resolves paths named in `COMPONENT` and `PROGRAM` keys,
//!    either on disk (`FsProvider`) or in memory (`MemoryProvider`).
//! 3. **Assembly:** `Loader` builds a platform tree, inserting each child into the arena and
//!    registering it before the next sibling is loaded, so later siblings can bind to it.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::LoadError;
use crate::config::{BusConfig, CpuConfig, DisplayConfig, MemoryConfig, PlatformConfig};
use crate::core::Cpu;
use crate::core::program::Program;
use crate::soc::arena::ComponentArena;
use crate::soc::devices::Display;
use crate::soc::interconnect::Bus;
use crate::soc::memory::Memory;
use crate::soc::platform::Platform;
use crate::soc::registry::Registry;
use crate::soc::traits::{Component, ComponentKind};

/// One `KEY: VALUE` pair with its position in the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Trimmed key.
    pub key: String,
    /// Trimmed value.
    pub value: String,
    /// One-based line number.
    pub line: usize,
}

/// Sequential supply of configuration entries for one component.
pub trait ConfigSource {
    /// Name of the source (usually its path), used in diagnostics.
    fn origin(&self) -> &str;

    /// Returns the next entry, or `None` once the source is exhausted.
    fn next_entry(&mut self) -> Option<ConfigEntry>;
}

/// `ConfigSource` over the text of a `KEY: VALUE` file.
///
/// Lines are split at the first `:` and both halves trimmed. Blank lines, lines without a colon
/// and lines with an empty value are skipped.
#[derive(Clone, Debug, Default)]
pub struct KeyValueSource {
    origin: String,
    entries: VecDeque<ConfigEntry>,
}

impl KeyValueSource {
    /// Parses `text`, labelling diagnostics with `origin`.
    pub fn parse(origin: &str, text: &str) -> Self {
        let entries = text
            .lines()
            .enumerate()
            .filter_map(|(i, line)| {
                let (key, value) = line.split_once(':')?;
                let (key, value) = (key.trim(), value.trim());
                if key.is_empty() || value.is_empty() {
                    return None;
                }
                Some(ConfigEntry {
                    key: key.to_owned(),
                    value: value.to_owned(),
                    line: i + 1,
                })
            })
            .collect();
        Self {
            origin: origin.to_owned(),
            entries,
        }
    }

    /// Number of entries not consumed yet.
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }
}

impl ConfigSource for KeyValueSource {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn next_entry(&mut self) -> Option<ConfigEntry> {
        self.entries.pop_front()
    }
}

/// Resolves file paths named in configuration files.
pub trait ConfigProvider {
    /// Returns the full text of `path`.
    fn read_text(&self, path: &str) -> Result<String, LoadError>;

    /// Opens `path` as a `KEY: VALUE` source.
    fn open(&self, path: &str) -> Result<KeyValueSource, LoadError> {
        Ok(KeyValueSource::parse(path, &self.read_text(path)?))
    }
}

/// Provider reading from the filesystem.
///
/// A path is tried as given first. If that fails, the path is relative, and a base directory is
/// set, it is retried relative to the base directory.
#[derive(Clone, Debug, Default)]
pub struct FsProvider {
    base_dir: Option<PathBuf>,
}

impl FsProvider {
    /// Provider resolving paths against the working directory only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that falls back to `base_dir` for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Provider whose base directory is the parent of `config_path`.
    pub fn for_config(config_path: &str) -> Self {
        Path::new(config_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(Self::new, Self::with_base_dir)
    }
}

impl ConfigProvider for FsProvider {
    fn read_text(&self, path: &str) -> Result<String, LoadError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(text),
            Err(source) => {
                let fallback = self
                    .base_dir
                    .as_ref()
                    .filter(|_| Path::new(path).is_relative())
                    .and_then(|base| fs::read_to_string(base.join(path)).ok());
                fallback.ok_or_else(|| LoadError::Io {
                    path: path.to_owned(),
                    source,
                })
            }
        }
    }
}

/// Provider serving files from memory; used for embedded descriptions and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryProvider {
    files: HashMap<String, String>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file and returns the provider.
    #[must_use]
    pub fn with_file(mut self, path: &str, text: &str) -> Self {
        self.insert(path, text);
        self
    }

    /// Adds (or replaces) a file.
    pub fn insert(&mut self, path: &str, text: &str) {
        let _ = self.files.insert(path.to_owned(), text.to_owned());
    }
}

impl ConfigProvider for MemoryProvider {
    fn read_text(&self, path: &str) -> Result<String, LoadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::MissingFile {
                path: path.to_owned(),
            })
    }
}

/// Returns the kind hint of a `COMPONENT` value: the text after the first `/`, or the whole
/// value when it has no `/`.
pub fn kind_hint(value: &str) -> &str {
    value.split_once('/').map_or(value, |(_, rest)| rest)
}

/// Maps a kind hint to the component kind it names.
///
/// Substrings are checked in the order `cpu`, `mem`, `bus`, `display`, `platform`.
pub fn kind_from_hint(hint: &str) -> Option<ComponentKind> {
    [
        ("cpu", ComponentKind::Cpu),
        ("mem", ComponentKind::Memory),
        ("bus", ComponentKind::Bus),
        ("display", ComponentKind::Display),
        ("platform", ComponentKind::Platform),
    ]
    .into_iter()
    .find(|(needle, _)| hint.contains(needle))
    .map(|(_, kind)| kind)
}

/// Deepest platform nesting the loader accepts.
pub const MAX_PLATFORM_DEPTH: usize = 64;

/// Builds platform trees from configuration files.
pub struct Loader<'a> {
    provider: &'a dyn ConfigProvider,
    components: &'a mut ComponentArena,
    registry: &'a mut Registry,
    /// Paths of the platforms currently being loaded, outermost first.
    include_stack: Vec<String>,
}

impl std::fmt::Debug for Loader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("components", &self.components)
            .field("registry", &self.registry)
            .field("include_stack", &self.include_stack)
            .finish_non_exhaustive()
    }
}

impl<'a> Loader<'a> {
    /// Creates a loader inserting into `components` and registering into `registry`.
    pub fn new(
        provider: &'a dyn ConfigProvider,
        components: &'a mut ComponentArena,
        registry: &'a mut Registry,
    ) -> Self {
        Self {
            provider,
            components,
            registry,
            include_stack: Vec::new(),
        }
    }

    /// Loads the platform described by `path` together with all its children.
    ///
    /// Children are inserted into the arena as they load; the returned platform itself is not
    /// inserted. Failing children are logged and skipped.
    ///
    /// A platform that is already being loaded further up the tree fails with
    /// `RecursiveInclude`, and nesting beyond [`MAX_PLATFORM_DEPTH`] fails with
    /// `NestingTooDeep`. Either way only that child is skipped.
    pub fn load_platform(&mut self, path: &str) -> Result<Platform, LoadError> {
        if self.include_stack.iter().any(|p| p == path) {
            return Err(LoadError::RecursiveInclude {
                path: path.to_owned(),
            });
        }
        if self.include_stack.len() >= MAX_PLATFORM_DEPTH {
            return Err(LoadError::NestingTooDeep {
                path: path.to_owned(),
                limit: MAX_PLATFORM_DEPTH,
            });
        }
        tracing::info!(path, depth = self.include_stack.len(), "loading platform configuration");
        let mut source = self.provider.open(path)?;
        let config = PlatformConfig::from_source(&mut source)?;
        let mut platform = Platform::new(&config.label);

        self.include_stack.push(path.to_owned());
        for child in &config.components {
            self.load_child(child, &mut platform);
        }
        let _ = self.include_stack.pop();
        Ok(platform)
    }

    /// Loads a BUS, binding its source through the registry.
    pub fn load_bus(&mut self, path: &str) -> Result<Bus, LoadError> {
        let config = BusConfig::from_source(&mut self.provider.open(path)?)?;
        Ok(Bus::from_config(&config, self.registry))
    }

    /// Loads a MEMORY, binding its source through the registry if it is already known.
    pub fn load_memory(&mut self, path: &str) -> Result<Memory, LoadError> {
        let config = MemoryConfig::from_source(&mut self.provider.open(path)?)?;
        Ok(Memory::from_config(&config, self.registry))
    }

    /// Loads a CPU and its program file.
    pub fn load_cpu(&mut self, path: &str) -> Result<Cpu, LoadError> {
        let config = CpuConfig::from_source(&mut self.provider.open(path)?)?;
        let program = match &config.program {
            Some(program_path) => Program::parse(&self.provider.read_text(program_path)?)?,
            None => Program::default(),
        };
        Ok(Cpu::from_config(&config, program))
    }

    /// Loads a DISPLAY, binding its source through the registry.
    pub fn load_display(&mut self, path: &str) -> Result<Display, LoadError> {
        let config = DisplayConfig::from_source(&mut self.provider.open(path)?)?;
        Ok(Display::from_config(&config, self.registry))
    }

    fn load_child(&mut self, path: &str, platform: &mut Platform) {
        let Some(kind) = kind_from_hint(kind_hint(path)) else {
            tracing::error!(path, "unknown component type; skipped");
            return;
        };
        let loaded: Result<Box<dyn Component>, LoadError> = match kind {
            ComponentKind::Cpu => self.load_cpu(path).map(|c| Box::new(c) as Box<dyn Component>),
            ComponentKind::Memory => self.load_memory(path).map(|m| Box::new(m) as _),
            ComponentKind::Bus => self.load_bus(path).map(|b| Box::new(b) as _),
            ComponentKind::Display => self.load_display(path).map(|d| Box::new(d) as _),
            ComponentKind::Platform => self.load_platform(path).map(|p| Box::new(p) as _),
            ComponentKind::External => return,
        };
        match loaded {
            Ok(component) => {
                let label = component.label().to_owned();
                let handle = self.components.insert(component);
                if registers_as_source(kind) {
                    let _ = self.registry.register(&label, handle);
                    platform.record_registration(handle);
                }
                platform.attach(kind, handle);
                tracing::debug!(path, %kind, label = %label, %handle, "component loaded");
            }
            Err(error) => tracing::error!(path, %kind, %error, "error loading component; skipped"),
        }
    }
}

/// Kinds that other components may bind to by label.
const fn registers_as_source(kind: ComponentKind) -> bool {
    matches!(
        kind,
        ComponentKind::Cpu | ComponentKind::Memory | ComponentKind::Bus
    )
}

