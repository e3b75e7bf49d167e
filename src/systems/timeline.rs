//! Timeline advancement.
//!
//! Runs first in the frame so every scripted property change is visible to
//! the emitter, movement and cull systems of the same frame.
//!
//! A timeline whose bound object has been destroyed is marked inert here and
//! dropped at compaction. Property errors are turned into
//! [`PropertyFault`] messages.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::action::{ActionFault, Progress};
use crate::components::body::BodyHandle;
use crate::components::timeline::{Target, Timeline};
use crate::events::fault::PropertyFault;
use crate::pool::Lifecycle;
use crate::resources::actionupdater::ActionUpdater;
use crate::resources::bodyupdater::BodyUpdater;
use crate::resources::emitters::Emitters;
use crate::resources::properties::{PropertyRegistry, Unbound};
use crate::resources::worldtime::WorldTime;

/// Advance a free timeline against the object it is bound to.
pub fn advance_bound(
    timeline: &mut Timeline,
    dt: f32,
    registry: &PropertyRegistry,
    bodies: &mut BodyUpdater,
    emitters: &mut Emitters,
    faults: &mut Vec<ActionFault>,
) -> Progress {
    match timeline.target() {
        Some(Target::Body(handle)) => match bodies.get_mut(handle) {
            Some(body) => timeline.advance(dt, &mut registry.bind(body), faults),
            None => {
                timeline.mark_inert();
                Progress::Finished { overflow: dt }
            }
        },
        Some(Target::Emitter(handle)) => match emitters.get_mut(handle) {
            Some(emitter) => timeline.advance(dt, &mut registry.bind(emitter), faults),
            None => {
                timeline.mark_inert();
                Progress::Finished { overflow: dt }
            }
        },
        None => timeline.advance(dt, &mut Unbound, faults),
    }
}

/// Advance the applied timeline of an active body against the body itself.
///
/// Returns `None` if the body is gone, not active, or has no timeline.
pub fn advance_applied_timeline(
    bodies: &mut BodyUpdater,
    registry: &PropertyRegistry,
    handle: BodyHandle,
    dt: f32,
    faults: &mut Vec<ActionFault>,
) -> Option<Progress> {
    if bodies.state(handle) != Some(Lifecycle::Active) {
        return None;
    }
    let body = bodies.get_mut(handle)?;
    let mut timeline = body.take_timeline()?;
    let progress = timeline.advance(dt, &mut registry.bind(&mut *body), faults);
    body.set_timeline(timeline);
    Some(progress)
}

/// Advance every free timeline, then every driven body's applied timeline.
/// Active bodies given a timeline outside the facade are adopted first.
pub fn timeline_system(
    time: Res<WorldTime>,
    registry: Res<PropertyRegistry>,
    mut actions: ResMut<ActionUpdater>,
    mut bodies: ResMut<BodyUpdater>,
    mut emitters: ResMut<Emitters>,
    mut writer: MessageWriter<PropertyFault>,
) {
    let dt = time.delta;
    if dt <= 0.0 {
        return;
    }
    let registry = &*registry;
    let bodies = &mut *bodies;
    let emitters = &mut *emitters;
    let mut faults: Vec<PropertyFault> = Vec::new();
    let mut raised: Vec<ActionFault> = Vec::new();

    let adopted = actions.adopt_applied(bodies);
    if adopted > 0 {
        debug!("Adopted {} applied timelines", adopted);
    }

    actions.for_each_active_mut(|_, timeline| {
        advance_bound(timeline, dt, registry, bodies, emitters, &mut raised);
        let target = timeline.target();
        faults.extend(
            raised
                .drain(..)
                .map(|fault| PropertyFault::from_action(target, fault)),
        );
    });

    for i in 0..actions.driven().len() {
        let handle = actions.driven()[i];
        advance_applied_timeline(bodies, registry, handle, dt, &mut raised);
        faults.extend(
            raised
                .drain(..)
                .map(|fault| PropertyFault::from_action(Some(Target::Body(handle)), fault)),
        );
    }

    if !faults.is_empty() {
        writer.write_batch(faults);
    }
}
