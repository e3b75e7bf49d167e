//! Hit geometry and collision predicates for bodies.
//!
//! A body collides through its [`Hitbox`]: the default `Circle` uses the
//! body's radius, `Rect` a box of the given size centred on the body. Circle
//! tests are strict, so shapes that only touch do not collide.

use serde::{Deserialize, Serialize};

use crate::components::body::Body;
use crate::geometry::{BoundingBox, Segment, Vector2};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Hitbox {
    #[default]
    Circle,
    Rect { width: f32, height: f32 },
}

impl Hitbox {
    /// Axis-aligned bounds of this hitbox placed at `position`.
    pub fn bounds(&self, position: Vector2, radius: f32) -> BoundingBox {
        match *self {
            Hitbox::Circle => BoundingBox::from_center(position, radius * 2.0, radius * 2.0),
            Hitbox::Rect { width, height } => BoundingBox::from_center(position, width, height),
        }
    }
}

/// A query shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Box(BoundingBox),
    Circle { center: Vector2, radius: f32 },
    Segment(Segment),
}

impl Shape {
    pub fn collides<C: Collide + ?Sized>(&self, object: &C) -> bool {
        match self {
            Shape::Box(rect) => object.is_collided_box(rect),
            Shape::Circle { center, radius } => object.is_collided_circle(*center, *radius),
            Shape::Segment(seg) => object.is_collided_segment(seg),
        }
    }
}

pub trait Collide {
    fn is_collided_box(&self, rect: &BoundingBox) -> bool;
    fn is_collided_circle(&self, center: Vector2, radius: f32) -> bool;
    fn is_collided_segment(&self, seg: &Segment) -> bool;

    fn is_collided_with(&self, other: &Body) -> bool {
        match other.hitbox {
            Hitbox::Circle => self.is_collided_circle(other.position, other.radius()),
            Hitbox::Rect { .. } => self.is_collided_box(&other.bounds()),
        }
    }
}

impl Body {
    pub fn bounds(&self) -> BoundingBox {
        self.hitbox.bounds(self.position, self.radius())
    }
}

impl Collide for Body {
    fn is_collided_box(&self, rect: &BoundingBox) -> bool {
        match self.hitbox {
            Hitbox::Circle => rect.intersects_circle(self.position, self.radius()),
            Hitbox::Rect { .. } => rect.intersects_box(&self.bounds()),
        }
    }

    fn is_collided_circle(&self, center: Vector2, radius: f32) -> bool {
        match self.hitbox {
            Hitbox::Circle => self.position.distance_to(center) < self.radius() + radius,
            Hitbox::Rect { .. } => self.bounds().intersects_circle(center, radius),
        }
    }

    fn is_collided_segment(&self, seg: &Segment) -> bool {
        match self.hitbox {
            Hitbox::Circle => seg.intersects_circle(self.position, self.radius()),
            Hitbox::Rect { .. } => seg.intersects_box(&self.bounds()),
        }
    }
}

/// Reflect `body`'s heading about a surface normal given in degrees.
pub fn rebound(body: &mut Body, normal: f32) {
    body.set_angle(normal * 2.0 - body.angle());
}
