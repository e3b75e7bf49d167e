//! Registry of running timelines.
//!
//! Two kinds of timeline are driven each frame:
//!
//! - *free* timelines stored here and bound to any object through a
//!   [`Target`] (emitters, prototypes, other bodies)
//! - *applied* timelines carried by a body itself; the updater only records
//!   which bodies to drive
//!
//! Finished and inert free timelines are dropped at compaction, as are
//! handles of bodies that have been destroyed. Active bodies that gained a
//! timeline without being registered are picked up by
//! [`ActionUpdater::adopt_applied`].

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHashSet;

use crate::components::body::BodyHandle;
use crate::components::timeline::Timeline;
use crate::pool::{Handle, Pool};
use crate::resources::bodyupdater::BodyUpdater;

pub type TimelineHandle = Handle<Timeline>;

#[derive(Resource, Default)]
pub struct ActionUpdater {
    timelines: Pool<Timeline>,
    active: Vec<TimelineHandle>,
    driven: Vec<BodyHandle>,
    driven_set: FxHashSet<BodyHandle>,
}

impl ActionUpdater {
    /// Store and start a free timeline.
    pub fn add(&mut self, timeline: Timeline) -> TimelineHandle {
        let handle = self.timelines.construct(timeline);
        // A freshly constructed slot always accepts activation.
        let _ = self.timelines.activate(handle);
        self.active.push(handle);
        handle
    }

    pub fn get(&self, handle: TimelineHandle) -> Option<&Timeline> {
        self.timelines.get(handle)
    }

    pub fn get_mut(&mut self, handle: TimelineHandle) -> Option<&mut Timeline> {
        self.timelines.get_mut(handle)
    }

    /// Stop and drop a free timeline. Returns false if it was already gone.
    pub fn remove(&mut self, handle: TimelineHandle) -> bool {
        if !self.timelines.is_alive(handle) || self.timelines.destroy(handle).is_err() {
            return false;
        }
        self.active.retain(|h| *h != handle);
        true
    }

    /// Drive `body`'s applied timeline every frame.
    pub fn register_body(&mut self, body: BodyHandle) {
        if self.driven_set.insert(body) {
            self.driven.push(body);
        }
    }

    /// Register every active body that carries a timeline. Returns how many
    /// were newly registered.
    pub fn adopt_applied(&mut self, bodies: &BodyUpdater) -> usize {
        let before = self.driven.len();
        for (handle, body) in bodies.iter() {
            if body.has_timeline() {
                self.register_body(handle);
            }
        }
        self.driven.len() - before
    }

    /// Free timelines, in insertion order.
    pub fn active(&self) -> &[TimelineHandle] {
        &self.active
    }

    /// Bodies whose applied timelines are driven.
    pub fn driven(&self) -> &[BodyHandle] {
        &self.driven
    }

    pub fn for_each_active_mut(&mut self, mut f: impl FnMut(TimelineHandle, &mut Timeline)) {
        for &handle in &self.active {
            if let Some(timeline) = self.timelines.get_mut(handle) {
                f(handle, timeline);
            }
        }
    }

    /// Drop finished free timelines and dead or timeline-less bodies.
    pub fn compact(&mut self, bodies: &BodyUpdater) -> usize {
        let timelines = &mut self.timelines;
        let before = self.active.len();
        self.active.retain(|&handle| {
            let keep = timelines.get(handle).is_some_and(|t| !t.is_complete());
            if !keep && timelines.is_alive(handle) {
                let _ = timelines.destroy(handle);
            }
            keep
        });
        let dropped = before - self.active.len();
        let driven_set = &mut self.driven_set;
        self.driven.retain(|&body| {
            let keep = bodies.is_alive(body) && bodies.get(body).is_some_and(|b| b.has_timeline());
            if !keep {
                driven_set.remove(&body);
            }
            keep
        });
        if dropped > 0 {
            debug!("Dropped {} finished timelines, {} running", dropped, self.active.len());
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
