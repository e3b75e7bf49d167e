use bevy_ecs::prelude::*;

use crate::resources::bodyupdater::BodyUpdater;
use crate::resources::worldtime::WorldTime;

/// Integrate every active, unfrozen body by one frame.
pub fn movement_system(mut bodies: ResMut<BodyUpdater>, time: Res<WorldTime>) {
    let dt = time.delta;
    if dt <= 0.0 {
        return;
    }
    bodies.for_each_active_mut(|_, body| {
        if !body.is_frozen {
            body.integrate(dt);
        }
    });
}
