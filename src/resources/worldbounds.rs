use bevy_ecs::prelude::Resource;

use crate::geometry::{BoundingBox, Vector2};

/// Box outside of which off-screen bodies are destroyed.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct WorldBounds(pub BoundingBox);

impl WorldBounds {
    /// True once a circle of `radius` at `position` has fully left the box.
    pub fn is_outside(&self, position: Vector2, radius: f32) -> bool {
        !self.0.expanded(radius).contains(position)
    }
}
