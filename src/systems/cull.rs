//! Destruction policies.
//!
//! A body flagged `destroy_when_move_off_screen` is destroyed once it has
//! fully left the world box; one flagged `destroy_when_timeline_end` once its
//! applied timeline is done. Bodies are only marked here and returned to the
//! pool by [`compact_system`](crate::systems::compact::compact_system).

use bevy_ecs::prelude::*;
use log::error;
use smallvec::SmallVec;

use crate::components::body::{Body, BodyHandle};
use crate::resources::bodyupdater::BodyUpdater;
use crate::resources::worldbounds::WorldBounds;

pub fn should_destroy(body: &Body, bounds: &WorldBounds) -> bool {
    (body.destroy_when_move_off_screen && bounds.is_outside(body.position, body.radius()))
        || (body.destroy_when_timeline_end && body.timeline().is_some_and(|t| t.is_complete()))
}

pub fn cull_system(mut bodies: ResMut<BodyUpdater>, bounds: Res<WorldBounds>) {
    let doomed: SmallVec<[BodyHandle; 32]> = bodies
        .iter()
        .filter(|(_, body)| should_destroy(body, &bounds))
        .map(|(handle, _)| handle)
        .collect();
    for handle in doomed {
        if let Err(e) = bodies.mark_destroy(handle) {
            error!("Could not cull body {:?}: {}", handle, e);
        }
    }
}
