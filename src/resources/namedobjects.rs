//! Name → object lookup for data-driven loaders.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::components::timeline::Target;
use crate::resources::actionupdater::TimelineHandle;

#[derive(Resource, Default, Debug)]
pub struct NamedObjects {
    names: FxHashMap<String, Target>,
    scripts: FxHashMap<String, TimelineHandle>,
}

impl NamedObjects {
    /// Bind `name` to `target`, returning the previous binding. Rebinding a
    /// name to another object forgets its script timeline.
    pub fn insert(&mut self, name: impl Into<String>, target: Target) -> Option<Target> {
        let name = name.into();
        let previous = self.names.insert(name.clone(), target);
        if previous.is_some_and(|p| p != target) {
            self.scripts.remove(&name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Target> {
        self.names.get(name).copied()
    }

    pub fn remove(&mut self, name: &str) -> Option<Target> {
        self.scripts.remove(name);
        self.names.remove(name)
    }

    /// Timeline that instructions addressed to `name` append to.
    pub fn script(&self, name: &str) -> Option<TimelineHandle> {
        self.scripts.get(name).copied()
    }

    pub fn set_script(&mut self, name: impl Into<String>, timeline: TimelineHandle) {
        self.scripts.insert(name.into(), timeline);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
