//! Generational storage for the components of one simulation run.
//!
//! Every component lives in exactly one slot of a `ComponentArena`. Other parts of the
//! simulator refer to it through a `Handle` (slot index plus generation):
//! 1. **Safe staleness:** Freeing a slot bumps its generation, so old handles stop resolving.
//! 2. **Checkout:** A component being simulated is moved out of its slot and restored
//!    afterwards; while out, reads through its handle see no data.

use std::fmt;

use crate::soc::traits::Component;

/// Lightweight reference to a component slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Returns the slot index.
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the slot generation this handle was issued for.
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

enum SlotState {
    Vacant,
    Occupied(Box<dyn Component>),
    CheckedOut,
}

struct Slot {
    generation: u32,
    state: SlotState,
}

/// Slot arena owning all components of a run.
#[derive(Default)]
pub struct ComponentArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl fmt::Debug for ComponentArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentArena")
            .field("slots", &self.slots.len())
            .field("live", &self.live)
            .finish()
    }
}

impl ComponentArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live components (including checked-out ones).
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if the arena holds no component.
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Stores a component and returns its handle. Freed slots are reused.
    pub fn insert(&mut self, component: Box<dyn Component>) -> Handle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.state = SlotState::Occupied(component);
            return Handle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            state: SlotState::Occupied(component),
        });
        Handle {
            index,
            generation: 0,
        }
    }

    fn slot(&self, handle: Handle) -> Option<&Slot> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
    }

    fn slot_mut(&mut self, handle: Handle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
    }

    /// Returns `true` while `handle` refers to a component that has not been removed.
    pub fn contains(&self, handle: Handle) -> bool {
        self.slot(handle)
            .is_some_and(|s| !matches!(s.state, SlotState::Vacant))
    }

    /// Returns the component behind `handle`, unless stale or checked out.
    pub fn get(&self, handle: Handle) -> Option<&dyn Component> {
        match &self.slot(handle)?.state {
            SlotState::Occupied(c) => Some(c.as_ref()),
            SlotState::Vacant | SlotState::CheckedOut => None,
        }
    }

    /// Mutable variant of [`ComponentArena::get`].
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut dyn Component> {
        match &mut self.slot_mut(handle)?.state {
            SlotState::Occupied(c) => Some(c.as_mut()),
            SlotState::Vacant | SlotState::CheckedOut => None,
        }
    }

    /// Removes a component, invalidating every copy of `handle`.
    ///
    /// A checked-out component cannot be removed.
    pub fn remove(&mut self, handle: Handle) -> Option<Box<dyn Component>> {
        let slot = self.slot_mut(handle)?;
        if !matches!(slot.state, SlotState::Occupied(_)) {
            return None;
        }
        let SlotState::Occupied(component) = std::mem::replace(&mut slot.state, SlotState::Vacant)
        else {
            return None;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(component)
    }

    /// Moves a component out of its slot for the duration of its own cycle.
    pub fn checkout(&mut self, handle: Handle) -> Option<Box<dyn Component>> {
        let slot = self.slot_mut(handle)?;
        if !matches!(slot.state, SlotState::Occupied(_)) {
            return None;
        }
        match std::mem::replace(&mut slot.state, SlotState::CheckedOut) {
            SlotState::Occupied(component) => Some(component),
            other => {
                slot.state = other;
                None
            }
        }
    }

    /// Puts a checked-out component back.
    pub fn restore(&mut self, handle: Handle, component: Box<dyn Component>) {
        if let Some(slot) = self.slot_mut(handle) {
            if matches!(slot.state, SlotState::CheckedOut) {
                slot.state = SlotState::Occupied(component);
                return;
            }
        }
        tracing::error!(%handle, "restore into a slot that was not checked out; component dropped");
    }

    /// Iterates over all components currently stored, with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &dyn Component)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| match &s.state {
            SlotState::Occupied(c) => Some((
                Handle {
                    index: i as u32,
                    generation: s.generation,
                },
                c.as_ref(),
            )),
            SlotState::Vacant | SlotState::CheckedOut => None,
        })
    }
}
