//! Registry of emitters advanced each frame.

use bevy_ecs::prelude::Resource;

use crate::components::emitter::{Emitter, EmitterHandle};
use crate::error::PoolError;
use crate::pool::Pool;

#[derive(Resource, Default)]
pub struct Emitters {
    pool: Pool<Emitter>,
    active: Vec<EmitterHandle>,
}

impl Emitters {
    /// Store an emitter and start advancing it.
    pub fn add(&mut self, emitter: Emitter) -> EmitterHandle {
        let handle = self.pool.construct(emitter);
        // A freshly constructed slot always accepts activation.
        let _ = self.pool.activate(handle);
        self.active.push(handle);
        handle
    }

    pub fn remove(&mut self, handle: EmitterHandle) -> Result<(), PoolError> {
        self.pool.destroy(handle)?;
        self.active.retain(|h| *h != handle);
        Ok(())
    }

    pub fn get(&self, handle: EmitterHandle) -> Option<&Emitter> {
        self.pool.get(handle)
    }

    pub fn get_mut(&mut self, handle: EmitterHandle) -> Option<&mut Emitter> {
        self.pool.get_mut(handle)
    }

    pub fn is_alive(&self, handle: EmitterHandle) -> bool {
        self.pool.is_alive(handle)
    }

    pub fn active(&self) -> &[EmitterHandle] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
