//! Typed free-list allocator backing every simulation object.
//!
//! A [`Pool`] owns its objects in a vector of slots. Destroyed slots go onto
//! a free list and are reused by later constructions. Each slot carries a
//! generation counter that is bumped on destroy, so a [`Handle`] to a
//! destroyed object never resolves to the slot's next occupant. Stale handles
//! are how timelines notice that their target is gone.
//!
//! Lifecycle of a slot:
//!
//! ```text
//! construct/clone ──► Constructed ──activate──► Active
//!                          │                      │
//!                          │               mark_pending_destroy
//!                          │                      ▼
//!                          └─────destroy───► PendingDestroy ──destroy──► Recycled
//! ```
//!
//! [`Poolable::on_construct`] and [`Poolable::on_destroy`] run exactly once
//! per construct/destroy pair.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::error::PoolError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Constructed,
    Active,
    PendingDestroy,
    Recycled,
}

/// Construct/destroy hooks for pooled objects.
pub trait Poolable {
    fn on_construct(&mut self) {}
    fn on_destroy(&mut self) {}
}

/// Generational index into a [`Pool<T>`].
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
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
    state: Lifecycle,
    value: Option<T>,
}

pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }
}

impl<T: Poolable> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool with `capacity` pre-allocated free slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            live: 0,
        };
        for index in 0..capacity {
            pool.slots.push(Slot {
                generation: 0,
                state: Lifecycle::Recycled,
                value: None,
            });
            pool.free.push(index as u32);
        }
        // Pop order should hand out the lowest index first.
        pool.free.reverse();
        pool
    }

    /// Store `value` in a free slot (or a new one) and run its construct hook.
    pub fn construct(&mut self, mut value: T) -> Handle<T> {
        value.on_construct();
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.state = Lifecycle::Constructed;
            slot.value = Some(value);
            return Handle::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            state: Lifecycle::Constructed,
            value: Some(value),
        });
        Handle::new(index, 0)
    }

    /// Construct a copy of a live object.
    pub fn clone_from(&mut self, source: Handle<T>) -> Result<Handle<T>, PoolError>
    where
        T: Clone,
    {
        let copy = self
            .get(source)
            .cloned()
            .ok_or(PoolError::UseAfterDestroy {
                index: source.index,
            })?;
        Ok(self.construct(copy))
    }

    /// Constructed → Active.
    pub fn activate(&mut self, handle: Handle<T>) -> Result<(), PoolError> {
        let slot = self.slot_mut(handle)?;
        match slot.state {
            Lifecycle::Constructed => {
                slot.state = Lifecycle::Active;
                Ok(())
            }
            from => Err(PoolError::InvalidTransition {
                index: handle.index,
                from,
                to: Lifecycle::Active,
            }),
        }
    }

    /// Flag a live object for destruction at the next compaction.
    pub fn mark_pending_destroy(&mut self, handle: Handle<T>) -> Result<(), PoolError> {
        let slot = self.slot_mut(handle)?;
        slot.state = Lifecycle::PendingDestroy;
        Ok(())
    }

    /// Run the destroy hook and return the slot to the free list.
    ///
    /// Destroying a handle whose slot was already recycled is a
    /// [`PoolError::DoubleFree`]. Debug builds panic on it.
    pub fn destroy(&mut self, handle: Handle<T>) -> Result<(), PoolError> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .ok_or(PoolError::UseAfterDestroy {
                index: handle.index,
            })?;
        if slot.generation != handle.generation || slot.state == Lifecycle::Recycled {
            return Err(lifecycle_violation(PoolError::DoubleFree {
                index: handle.index,
            }));
        }
        if let Some(mut value) = slot.value.take() {
            value.on_destroy();
        }
        slot.state = Lifecycle::Recycled;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Ok(())
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Current lifecycle state, or `None` for a stale handle.
    pub fn state(&self, handle: Handle<T>) -> Option<Lifecycle> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .map(|slot| slot.state)
    }

    /// True while the handle refers to an object that has not been recycled.
    pub fn is_alive(&self, handle: Handle<T>) -> bool {
        matches!(
            self.state(handle),
            Some(Lifecycle::Constructed | Lifecycle::Active | Lifecycle::PendingDestroy)
        )
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Total slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn free_slots(&self) -> usize {
        self.free.len()
    }

    fn slot_mut(&mut self, handle: Handle<T>) -> Result<&mut Slot<T>, PoolError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.state != Lifecycle::Recycled)
            .ok_or_else(|| {
                lifecycle_violation(PoolError::UseAfterDestroy {
                    index: handle.index,
                })
            })
    }
}

/// Double frees and transitions on recycled handles are caller bugs. Debug
/// builds abort on them; release builds hand the error back.
#[track_caller]
fn lifecycle_violation(error: PoolError) -> PoolError {
    #[cfg(debug_assertions)]
    panic!("pool lifecycle violation: {}", error);
    #[cfg(not(debug_assertions))]
    error
}
