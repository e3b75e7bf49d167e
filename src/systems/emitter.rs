//! Emitter system.
//!
//! Advances every [`Emitter`](crate::components::emitter::Emitter) and spawns
//! clones of its prototype.
//!
//! # Behavior
//!
//! - Accumulates time and fires one tick per elapsed interval
//! - Supports catch-up: if dt is large, several ticks fire in one frame
//! - Each clone is placed by the emitter's pattern, handed to the per-spawn
//!   callback, activated, and its applied timeline registered
//! - A clone from a tick that fired `age` seconds before the end of the frame
//!   is fast-forwarded by `age` (timeline, then movement), so catch-up spawns
//!   do not clump
//! - Emitters whose prototype is gone are skipped
//!
//! Spawned bodies join the active list at the end of the frame, so the
//! movement system does not move them a second time.

use bevy_ecs::prelude::*;
use log::{debug, error};

use crate::components::action::ActionFault;
use crate::components::timeline::Target;
use crate::events::fault::PropertyFault;
use crate::resources::actionupdater::ActionUpdater;
use crate::resources::bodyupdater::BodyUpdater;
use crate::resources::emitters::Emitters;
use crate::resources::properties::PropertyRegistry;
use crate::resources::worldtime::WorldTime;
use crate::systems::timeline::advance_applied_timeline;

/// System that processes emitters and spawns bodies.
///
/// # Ordering
///
/// Runs **after** `timeline_system` (clones copy the prototype's animated
/// state as of this frame) and **before** `movement_system`.
pub fn emitter_system(
    time: Res<WorldTime>,
    registry: Res<PropertyRegistry>,
    mut emitters: ResMut<Emitters>,
    mut bodies: ResMut<BodyUpdater>,
    mut actions: ResMut<ActionUpdater>,
    mut writer: MessageWriter<PropertyFault>,
) {
    let dt = time.delta;
    if dt <= 0.0 {
        return;
    }
    let mut faults: Vec<PropertyFault> = Vec::new();
    let mut raised: Vec<ActionFault> = Vec::new();

    for i in 0..emitters.active().len() {
        let handle = emitters.active()[i];
        let Some(emitter) = emitters.get_mut(handle) else {
            continue;
        };
        let Some(prototype) = emitter.prototype else {
            continue;
        };
        if !bodies.is_alive(prototype) {
            continue;
        }

        let ages = emitter.due_ticks(dt);
        let spawns_per_tick = emitter.spawns_per_tick();
        for (tick, &age) in ages.iter().enumerate() {
            for way in 0..spawns_per_tick {
                let clone = match bodies.clone_body(prototype) {
                    Ok(clone) => clone,
                    Err(e) => {
                        error!("Emitter {:?} could not clone prototype: {}", handle, e);
                        break;
                    }
                };
                let view = emitter.record_spawn(handle, tick as u32, way);
                let has_timeline = match bodies.get_mut(clone) {
                    Some(body) => {
                        emitter.place(body, way);
                        if let Some(callback) = &emitter.on_body_created {
                            callback(&view, body);
                        }
                        body.has_timeline()
                    }
                    None => false,
                };
                if let Err(e) = bodies.activate(clone) {
                    error!("Could not activate spawned body {:?}: {}", clone, e);
                    continue;
                }
                if has_timeline {
                    actions.register_body(clone);
                }

                if age > 0.0 {
                    advance_applied_timeline(&mut bodies, &registry, clone, age, &mut raised);
                    faults.extend(
                        raised
                            .drain(..)
                            .map(|f| PropertyFault::from_action(Some(Target::Body(clone)), f)),
                    );
                    if let Some(body) = bodies.get_mut(clone) {
                        if !body.is_frozen {
                            body.integrate(age);
                        }
                    }
                }
            }
        }
        if !ages.is_empty() {
            debug!(
                "Emitter {:?} fired {} ticks, {} spawned so far",
                handle,
                ages.len(),
                emitter.spawned_total()
            );
        }
    }

    if !faults.is_empty() {
        writer.write_batch(faults);
    }
}
