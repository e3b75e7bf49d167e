use bevy_ecs::prelude::*;

use crate::resources::actionupdater::ActionUpdater;
use crate::resources::bodyupdater::BodyUpdater;

/// End-of-frame compaction: recycle destroyed bodies, admit bodies spawned
/// this frame and drop finished timelines.
pub fn compact_system(mut bodies: ResMut<BodyUpdater>, mut actions: ResMut<ActionUpdater>) {
    bodies.compact();
    actions.compact(&bodies);
}
