//! Fixed-capacity entity pool with generational handles
//!
//! All slots are allocated once at construction. Releasing a slot bumps its
//! generation, so handles still held by callers stop resolving instead of
//! aliasing the next occupant.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::PhysicsBody;
use crate::config::ConfigError;

/// Opaque reference to a pooled entity: (slot index, generation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Acquire was called with every slot in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("entity pool exhausted (capacity {capacity})")]
pub struct PoolExhausted {
    pub capacity: usize,
}

/// Lifecycle hooks, injected at pool construction
pub trait PoolObserver {
    fn on_acquire(&mut self, _handle: Handle) {}
    fn on_release(&mut self, _handle: Handle) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PoolObserver for NoopObserver {}

#[derive(Debug, Clone, Default)]
struct Slot {
    active: bool,
    generation: u32,
    body: PhysicsBody,
}

pub struct EntityPool {
    slots: Box<[Slot]>,
    /// LIFO stack of free slot indices
    free_list: Vec<u32>,
    active_count: usize,
    observer: Box<dyn PoolObserver>,
}

impl fmt::Debug for EntityPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityPool")
            .field("capacity", &self.capacity())
            .field("active_count", &self.active_count)
            .field("free", &self.free_list.len())
            .finish()
    }
}

impl EntityPool {
    /// Create a pool with `capacity` slots and no observer
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Self::with_observer(capacity, Box::new(NoopObserver))
    }

    pub fn with_observer(
        capacity: usize,
        observer: Box<dyn PoolObserver>,
    ) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if capacity > u32::MAX as usize {
            return Err(ConfigError::CapacityTooLarge(capacity));
        }

        // Reversed so the first acquire hands out slot 0
        let free_list = (0..capacity as u32).rev().collect();
        log::info!("Entity pool created with capacity {}", capacity);

        Ok(Self {
            slots: vec![Slot::default(); capacity].into_boxed_slice(),
            free_list,
            active_count: 0,
            observer,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Take a free slot. The body is reset to defaults; the caller initializes it.
    pub fn acquire(&mut self) -> Result<Handle, PoolExhausted> {
        let Some(index) = self.free_list.pop() else {
            return Err(PoolExhausted {
                capacity: self.capacity(),
            });
        };

        let slot = &mut self.slots[index as usize];
        debug_assert!(!slot.active);
        slot.active = true;
        slot.body = PhysicsBody::default();
        self.active_count += 1;

        let handle = Handle {
            index,
            generation: slot.generation,
        };
        self.observer.on_acquire(handle);
        Ok(handle)
    }

    /// Return a slot to the pool.
    ///
    /// Returns false for a stale handle (already released); nothing changes.
    pub fn release(&mut self, handle: Handle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index()) else {
            log::debug!("Release ignored for out-of-range handle {}", handle);
            return false;
        };
        if !slot.active || slot.generation != handle.generation {
            log::debug!("Release ignored for stale handle {}", handle);
            return false;
        }

        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.active_count -= 1;
        self.observer.on_release(handle);
        true
    }

    /// Release every active entity
    pub fn release_all(&mut self) -> usize {
        let handles: Vec<Handle> = self.iter_active().map(|(h, _)| h).collect();
        handles.into_iter().filter(|&h| self.release(h)).count()
    }

    pub fn is_active(&self, handle: Handle) -> bool {
        self.slots
            .get(handle.index())
            .is_some_and(|slot| slot.active && slot.generation == handle.generation)
    }

    pub fn get(&self, handle: Handle) -> Option<&PhysicsBody> {
        self.is_active(handle)
            .then(|| &self.slots[handle.index()].body)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut PhysicsBody> {
        if self.is_active(handle) {
            Some(&mut self.slots[handle.index()].body)
        } else {
            None
        }
    }

    /// Mutable access to two distinct live bodies at once
    pub fn pair_mut(
        &mut self,
        a: Handle,
        b: Handle,
    ) -> Option<(&mut PhysicsBody, &mut PhysicsBody)> {
        if a.index == b.index || !self.is_active(a) || !self.is_active(b) {
            return None;
        }
        let (lo, hi, swapped) = if a.index < b.index {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        let (head, tail) = self.slots.split_at_mut(hi);
        let (first, second) = (&mut head[lo].body, &mut tail[0].body);
        if swapped {
            Some((second, first))
        } else {
            Some((first, second))
        }
    }

    /// Active entities in ascending slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (Handle, &PhysicsBody)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(i, slot)| {
                (
                    Handle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    &slot.body,
                )
            })
    }

    /// Active entities in ascending slot order (mutable)
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (Handle, &mut PhysicsBody)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(i, slot)| {
                (
                    Handle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    &mut slot.body,
                )
            })
    }

    /// Active handles in ascending slot order
    pub fn active_handles(&self) -> Vec<Handle> {
        self.iter_active().map(|(h, _)| h).collect()
    }
}
