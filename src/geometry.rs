//! Plain 2D geometry shared by bodies, emitters and collision queries.
//!
//! - [`Vector2`] – position, offset and direction values
//! - [`BoundingBox`] – axis-aligned box given by its min/max corners
//! - [`Segment`] – line segment between two points
//!
//! Angles are expressed in degrees everywhere in the engine; 0° points along
//! +X and angles grow towards +Y.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector pointing at `degrees`.
    pub fn from_angle(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { x: cos, y: sin }
    }

    pub fn scale_by(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_sqr(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_sqr().sqrt()
    }

    pub fn distance_to(self, other: Self) -> f32 {
        (other - self).length()
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl Add for Vector2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        self.scale_by(rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Axis-aligned box. `min` is the top-left corner, `max` the bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vector2,
    pub max: Vector2,
}

impl BoundingBox {
    /// Build a box from two opposite corners, normalizing them to min/max.
    pub fn new(a: Vector2, b: Vector2) -> Self {
        Self {
            min: Vector2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vector2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Box of the given size centred on `center`.
    pub fn from_center(center: Vector2, width: f32, height: f32) -> Self {
        let half = Vector2::new(width.abs() * 0.5, height.abs() * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vector2 {
        self.min.lerp(self.max, 0.5)
    }

    /// Grow the box by `amount` on every side.
    pub fn expanded(&self, amount: f32) -> Self {
        let grow = Vector2::new(amount, amount);
        Self {
            min: self.min - grow,
            max: self.max + grow,
        }
    }

    /// Point containment, edges included.
    pub fn contains(&self, point: Vector2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn closest_point(&self, point: Vector2) -> Vector2 {
        Vector2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// True when the circle overlaps the box. Touching is not an overlap.
    pub fn intersects_circle(&self, center: Vector2, radius: f32) -> bool {
        if self.contains(center) {
            return true;
        }
        let closest = self.closest_point(center);
        (center - closest).length_sqr() < radius * radius
    }

    pub fn intersects_box(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vector2,
    pub b: Vector2,
}

impl Segment {
    pub const fn new(a: Vector2, b: Vector2) -> Self {
        Self { a, b }
    }

    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::new(Vector2::new(x1, y1), Vector2::new(x2, y2))
    }

    pub fn length(&self) -> f32 {
        self.a.distance_to(self.b)
    }

    pub fn closest_point(&self, point: Vector2) -> Vector2 {
        let ab = self.b - self.a;
        let len_sqr = ab.length_sqr();
        if len_sqr <= f32::EPSILON {
            return self.a;
        }
        let t = ((point - self.a).dot(ab) / len_sqr).clamp(0.0, 1.0);
        self.a + ab * t
    }

    pub fn distance_to(&self, point: Vector2) -> f32 {
        self.closest_point(point).distance_to(point)
    }

    /// True when the segment passes closer than `radius` to `center`.
    pub fn intersects_circle(&self, center: Vector2, radius: f32) -> bool {
        self.distance_to(center) < radius
    }

    /// Slab test against an axis-aligned box.
    pub fn intersects_box(&self, rect: &BoundingBox) -> bool {
        if rect.contains(self.a) || rect.contains(self.b) {
            return true;
        }
        let dir = self.b - self.a;
        let mut t_min = 0.0f32;
        let mut t_max = 1.0f32;
        for (origin, delta, lo, hi) in [
            (self.a.x, dir.x, rect.min.x, rect.max.x),
            (self.a.y, dir.y, rect.min.y, rect.max.y),
        ] {
            if delta.abs() <= f32::EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }
            let t1 = (lo - origin) / delta;
            let t2 = (hi - origin) / delta;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}
