//! Label-to-component lookup for one simulation run.
//!
//! The registry maps user-assigned labels to component handles so that a consumer can bind to
//! a producer declared anywhere in the (possibly nested) platform description. It provides:
//! 1. **Registration:** Non-owning entries; duplicate labels are allowed but reported.
//! 2. **Resolution:** First match in registration order, exact string comparison.
//! 3. **Maintenance:** Deregistration and renaming, used when components are removed or relabelled.
//!
//! The registry holds handles, never components. Entries whose slot has been freed resolve to a
//! stale handle, which every arena operation rejects. The registry is plain mutable state with no
//! synchronisation; registration and lookup must not be interleaved from several threads.

use crate::soc::arena::Handle;

/// One registry entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Label the component was registered under.
    pub label: String,
    /// Handle of the registered component.
    pub handle: Handle,
}

/// Label registry scoped to a single simulation run.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry for `handle` under `label`.
    ///
    /// Returns `false` (after logging a warning) if the label was already taken; the new entry
    /// is still recorded, but resolution keeps returning the earlier one.
    pub fn register(&mut self, label: &str, handle: Handle) -> bool {
        let unique = self.resolve(label).is_none();
        if !unique {
            tracing::warn!(label, "duplicate component label; the first registration wins");
        }
        self.entries.push(RegistryEntry {
            label: label.to_owned(),
            handle,
        });
        unique
    }

    /// Returns the handle registered first under `label`.
    pub fn resolve(&self, label: &str) -> Option<Handle> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.handle)
    }

    /// Returns every handle registered under `label`, in registration order.
    pub fn resolve_all<'a>(&'a self, label: &'a str) -> impl Iterator<Item = Handle> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.label == label)
            .map(|e| e.handle)
    }

    /// Removes every entry pointing at `handle`. Returns the number of entries removed.
    pub fn deregister(&mut self, handle: Handle) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before - self.entries.len()
    }

    /// Updates the label of every entry pointing at `handle`.
    pub fn rename(&mut self, handle: Handle, label: &str) {
        for entry in self.entries.iter_mut().filter(|e| e.handle == handle) {
            label.clone_into(&mut entry.label);
        }
    }

    /// Returns all entries in registration order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
