//! Generation-checked slab storage.
//!
//! A [`Handle`] is an index into the slab paired with the generation of the slot at the time the
//! value was created. Releasing a value bumps the slot generation, so any handle still pointing at
//! it is rejected with [`StageError::StaleHandle`] instead of silently reading a recycled value.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::foundation::error::{StageError, StageResult};

/// Typed handle into a [`Pool`].
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Slot index.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation the handle was issued with.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slab of `T` addressed by generation-checked handles.
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("live", &self.live)
            .field("slots", &self.slots.len())
            .finish()
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    /// `true` when no value is live.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots ever allocated (live or free).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Store `value`, reusing a released slot when one exists.
    pub fn create(&mut self, value: T) -> Handle<T> {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Handle {
                index,
                generation: slot.generation,
                _marker: PhantomData,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        Handle {
            index,
            generation: 0,
            _marker: PhantomData,
        }
    }

    /// Remove the value behind `handle` and return it.
    ///
    /// Every outstanding copy of `handle` becomes stale.
    pub fn release(&mut self, handle: Handle<T>) -> StageResult<T> {
        let slot = self.slot_mut(handle)?;
        let value = slot.value.take().ok_or_else(|| stale(handle))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Ok(value)
    }

    /// `true` when `handle` still refers to a live value.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_ok()
    }

    /// Shared access to a live value.
    pub fn get(&self, handle: Handle<T>) -> StageResult<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.value.as_ref())
            .ok_or_else(|| stale(handle))
    }

    /// Exclusive access to a live value.
    pub fn get_mut(&mut self, handle: Handle<T>) -> StageResult<&mut T> {
        self.slot_mut(handle)?
            .value
            .as_mut()
            .ok_or_else(|| stale(handle))
    }

    /// Iterate over live values with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.value.as_ref().map(|v| {
                (
                    Handle {
                        index: i as u32,
                        generation: s.generation,
                        _marker: PhantomData,
                    },
                    v,
                )
            })
        })
    }

    fn slot_mut(&mut self, handle: Handle<T>) -> StageResult<&mut Slot<T>> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .ok_or_else(|| stale(handle))
    }
}

fn stale<T>(handle: Handle<T>) -> StageError {
    StageError::StaleHandle {
        index: handle.index,
        generation: handle.generation,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/pool.rs"]
mod tests;
