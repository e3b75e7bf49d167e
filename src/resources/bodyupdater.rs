//! Registry of live bodies.
//!
//! [`BodyUpdater`] owns the body pool and the list of active bodies iterated
//! every frame. Bodies activated while a frame is running land in an
//! incoming list and join the active list at compaction, and destruction is
//! deferred the same way: systems call [`BodyUpdater::mark_destroy`] and
//! [`BodyUpdater::compact`] returns the slots to the pool at the end of the
//! frame. Nothing is ever removed from a list that is being iterated.
//!
//! Bodies that are constructed but never activated (emitter prototypes) stay
//! in the pool without being moved, culled or drawn. Marking one for
//! destruction parks it until the next compaction like any other body.

use bevy_ecs::prelude::Resource;
use log::{debug, error};

use crate::components::body::{Body, BodyHandle};
use crate::error::PoolError;
use crate::pool::{Lifecycle, Pool};

#[derive(Resource, Default)]
pub struct BodyUpdater {
    pool: Pool<Body>,
    active: Vec<BodyHandle>,
    incoming: Vec<BodyHandle>,
    /// Constructed bodies marked for destruction; they sit in neither list.
    orphans: Vec<BodyHandle>,
}

impl BodyUpdater {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pool: Pool::with_capacity(capacity),
            active: Vec::with_capacity(capacity),
            incoming: Vec::new(),
            orphans: Vec::new(),
        }
    }

    /// Store a body in the Constructed state.
    pub fn construct(&mut self, body: Body) -> BodyHandle {
        self.pool.construct(body)
    }

    /// Construct a copy of `source`, applied timeline included.
    pub fn clone_body(&mut self, source: BodyHandle) -> Result<BodyHandle, PoolError> {
        self.pool.clone_from(source)
    }

    /// Constructed → Active. The body starts updating at the next compaction
    /// (or right away after [`BodyUpdater::flush_incoming`]).
    pub fn activate(&mut self, handle: BodyHandle) -> Result<(), PoolError> {
        self.pool.activate(handle)?;
        self.incoming.push(handle);
        Ok(())
    }

    /// Move bodies activated since the last call into the active list.
    pub fn flush_incoming(&mut self) {
        self.active.append(&mut self.incoming);
    }

    /// Flag a body for destruction at the next compaction.
    pub fn mark_destroy(&mut self, handle: BodyHandle) -> Result<(), PoolError> {
        let was = self.pool.state(handle);
        self.pool.mark_pending_destroy(handle)?;
        if was == Some(Lifecycle::Constructed) {
            self.orphans.push(handle);
        }
        Ok(())
    }

    /// Destroy a body immediately. Must not be called while iterating.
    pub fn destroy(&mut self, handle: BodyHandle) -> Result<(), PoolError> {
        self.pool.destroy(handle).inspect_err(|e| error!("Body destroy failed: {}", e))?;
        self.active.retain(|h| *h != handle);
        self.incoming.retain(|h| *h != handle);
        self.orphans.retain(|h| *h != handle);
        Ok(())
    }

    /// Return every PendingDestroy body to the pool, drop stale handles and
    /// merge incoming bodies. Returns how many bodies were destroyed.
    pub fn compact(&mut self) -> usize {
        let mut destroyed = 0;
        let pool = &mut self.pool;
        let mut keep = |handle: BodyHandle| match pool.state(handle) {
            Some(Lifecycle::Active) => true,
            Some(Lifecycle::PendingDestroy) => {
                match pool.destroy(handle) {
                    Ok(()) => destroyed += 1,
                    Err(e) => error!("Body destroy failed: {}", e),
                }
                false
            }
            _ => false,
        };
        self.active.retain(|&handle| keep(handle));
        self.incoming.retain(|&handle| keep(handle));
        for handle in self.orphans.drain(..) {
            keep(handle);
        }
        self.flush_incoming();
        if destroyed > 0 {
            debug!("Compacted {} bodies, {} active", destroyed, self.active.len());
        }
        destroyed
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.pool.get(handle)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.pool.get_mut(handle)
    }

    pub fn state(&self, handle: BodyHandle) -> Option<Lifecycle> {
        self.pool.state(handle)
    }

    pub fn is_alive(&self, handle: BodyHandle) -> bool {
        self.pool.is_alive(handle)
    }

    /// Handles of the active bodies, in activation order.
    pub fn active(&self) -> &[BodyHandle] {
        &self.active
    }

    /// Active bodies, stable for the duration of the borrow. Bodies marked
    /// for destruction this frame are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.active
            .iter()
            .filter(|&&handle| self.pool.state(handle) == Some(Lifecycle::Active))
            .filter_map(|&handle| self.pool.get(handle).map(|body| (handle, body)))
    }

    pub fn for_each_active_mut(&mut self, mut f: impl FnMut(BodyHandle, &mut Body)) {
        for &handle in &self.active {
            if self.pool.state(handle) != Some(Lifecycle::Active) {
                continue;
            }
            if let Some(body) = self.pool.get_mut(handle) {
                f(handle, body);
            }
        }
    }

    /// Number of active bodies.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Bodies waiting to join the active list.
    pub fn pending_len(&self) -> usize {
        self.incoming.len()
    }

    /// All live bodies in the pool, prototypes included.
    pub fn live_len(&self) -> usize {
        self.pool.len()
    }
}
