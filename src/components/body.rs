//! Moving, collidable simulation entity.
//!
//! A [`Body`] moves along its heading at its speed, both of which may drift
//! every second by `angle_addition` / `speed_addition`. The per-second offset
//! derived from speed and angle is cached and recomputed only when either
//! changes.
//!
//! Bodies live in the [`BodyUpdater`](crate::resources::bodyupdater::BodyUpdater)
//! pool. Cloning a body deep-copies its applied timeline, progress included,
//! so every clone animates on its own.

use crate::color::Color;
use crate::components::collision::Hitbox;
use crate::components::timeline::Timeline;
use crate::geometry::Vector2;
use crate::pool::{Handle, Poolable};
use crate::resources::properties::{PropertyTable, Reflect};
use crate::error::PropertyError;

pub type BodyHandle = Handle<Body>;

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Vector2,
    /// Heading in degrees.
    angle: f32,
    speed: f32,
    /// Degrees added to the heading per second.
    pub angle_addition: f32,
    /// Speed added per second.
    pub speed_addition: f32,
    radius: f32,
    pub color: Color,
    opacity: f32,
    pub scale: f32,
    /// Draw and collision grouping.
    pub layer: i32,
    pub texture: String,
    pub hitbox: Hitbox,
    pub is_frozen: bool,
    pub destroy_when_move_off_screen: bool,
    pub destroy_when_timeline_end: bool,
    is_bullet: bool,
    bullet_type: Option<String>,
    applied_timeline: Option<Timeline>,
    calculated_offset: Vector2,
    needs_calculate: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

impl Body {
    pub fn new() -> Self {
        Self {
            position: Vector2::zero(),
            angle: 0.0,
            speed: 0.0,
            angle_addition: 0.0,
            speed_addition: 0.0,
            radius: 0.0,
            color: Color::WHITE,
            opacity: 1.0,
            scale: 1.0,
            layer: 0,
            texture: String::new(),
            hitbox: Hitbox::Circle,
            is_frozen: false,
            destroy_when_move_off_screen: true,
            destroy_when_timeline_end: false,
            is_bullet: false,
            bullet_type: None,
            applied_timeline: None,
            calculated_offset: Vector2::zero(),
            needs_calculate: true,
        }
    }

    /// A body that rebounds and takes a bullet type.
    pub fn bullet() -> Self {
        Self {
            is_bullet: true,
            ..Self::new()
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vector2::new(x, y);
        self
    }

    pub fn with_motion(mut self, speed: f32, angle: f32) -> Self {
        self.set_speed(speed);
        self.set_angle(angle);
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.set_radius(radius);
        self
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f32) {
        if self.angle != angle {
            self.angle = angle;
            self.needs_calculate = true;
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        if self.speed != speed {
            self.speed = speed;
            self.needs_calculate = true;
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Negative radii are clamped to zero.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Clamped to `[0, 1]`. NaN counts as fully transparent.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
    }

    pub fn is_bullet(&self) -> bool {
        self.is_bullet
    }

    pub fn bullet_type(&self) -> Option<&str> {
        self.bullet_type.as_deref()
    }

    pub fn set_bullet_type(&mut self, name: impl Into<String>) {
        self.bullet_type = Some(name.into());
    }

    /// The body's own timeline, created empty on first access.
    pub fn applied_timeline(&mut self) -> &mut Timeline {
        self.applied_timeline.get_or_insert_with(Timeline::new)
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.applied_timeline.as_ref()
    }

    pub fn has_timeline(&self) -> bool {
        self.applied_timeline.is_some()
    }

    pub fn set_timeline(&mut self, timeline: Timeline) {
        self.applied_timeline = Some(timeline);
    }

    /// Detach the applied timeline, e.g. to advance it against this body.
    pub fn take_timeline(&mut self) -> Option<Timeline> {
        self.applied_timeline.take()
    }

    /// Offset per second as of the last [`Body::calculate`].
    pub fn calculated_offset(&self) -> Vector2 {
        self.calculated_offset
    }

    pub fn needs_calculate(&self) -> bool {
        self.needs_calculate
    }

    /// Recompute the per-second offset from speed and angle.
    pub fn calculate(&mut self) {
        self.calculated_offset = Vector2::from_angle(self.angle).scale_by(self.speed);
        self.needs_calculate = false;
    }

    /// Move one frame of `dt` seconds, then apply the angle/speed drift.
    pub fn integrate(&mut self, dt: f32) {
        if self.needs_calculate {
            self.calculate();
        }
        self.position += self.calculated_offset * dt;
        if self.angle_addition != 0.0 {
            self.set_angle(self.angle + self.angle_addition * dt);
        }
        if self.speed_addition != 0.0 {
            self.set_speed(self.speed + self.speed_addition * dt);
        }
    }
}

impl Poolable for Body {
    fn on_construct(&mut self) {
        self.needs_calculate = true;
    }

    fn on_destroy(&mut self) {
        self.applied_timeline = None;
    }
}

impl Reflect for Body {
    const TYPE_NAME: &'static str = "Body";

    fn register_properties(table: &mut PropertyTable<Self>) -> Result<(), PropertyError> {
        table.add("Position", |b: &Body| b.position, |b: &mut Body, v: Vector2| {
            b.position = v
        })?;
        table.add("X", |b: &Body| b.position.x, |b: &mut Body, v: f32| b.position.x = v)?;
        table.add("Y", |b: &Body| b.position.y, |b: &mut Body, v: f32| b.position.y = v)?;
        table.add(
            "Texture",
            |b: &Body| b.texture.clone(),
            |b: &mut Body, v: String| b.texture = v,
        )?;
        table.add("Color", |b: &Body| b.color, |b: &mut Body, v: Color| b.color = v)?;
        table.add("Scale", |b: &Body| b.scale, |b: &mut Body, v: f32| b.scale = v)?;
        table.add("Layer", |b: &Body| b.layer, |b: &mut Body, v: i32| b.layer = v)?;
        table.add("Radius", Body::radius, Body::set_radius)?;
        table.add("Angle", Body::angle, Body::set_angle)?;
        table.add("Speed", Body::speed, Body::set_speed)?;
        table.add(
            "AngleAddition",
            |b: &Body| b.angle_addition,
            |b: &mut Body, v: f32| b.angle_addition = v,
        )?;
        table.add(
            "SpeedAddition",
            |b: &Body| b.speed_addition,
            |b: &mut Body, v: f32| b.speed_addition = v,
        )?;
        table.add("Opacity", Body::opacity, Body::set_opacity)?;
        table.add(
            "IsFrozen",
            |b: &Body| b.is_frozen,
            |b: &mut Body, v: bool| b.is_frozen = v,
        )?;
        table.add(
            "IsDestroyWhenMoveOffScreen",
            |b: &Body| b.destroy_when_move_off_screen,
            |b: &mut Body, v: bool| b.destroy_when_move_off_screen = v,
        )?;
        table.add(
            "IsDestroyWhenTimelineEnd",
            |b: &Body| b.destroy_when_timeline_end,
            |b: &mut Body, v: bool| b.destroy_when_timeline_end = v,
        )?;
        table.add_read_only("IsBullet", Body::is_bullet)?;
        table.add_read_only("CalculatedOffset", Body::calculated_offset)?;
        table.add_setter("Type", |b: &mut Body, v: String| b.set_bullet_type(v))?;
        Ok(())
    }
}
