//! RGBA color with floating point channels.
//!
//! Channels are straight (not premultiplied) values in `0.0..=1.0`.
//! Interpolation is per-channel linear in that straight space; no gamma
//! correction is applied.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 0.5, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const PURE_GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const PURE_YELLOW_GREEN: Color = Color::rgb(0.6, 1.0, 0.0);
    pub const BEACH_SAND: Color = Color::rgb(1.0, 0.98, 0.6);
    pub const DESERT_SAND: Color = Color::rgb(0.93, 0.79, 0.69);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Look up a named color, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "white" => Self::WHITE,
            "black" => Self::BLACK,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "cyan" => Self::CYAN,
            "magenta" => Self::MAGENTA,
            "yellow" => Self::YELLOW,
            "puregreen" => Self::PURE_GREEN,
            "pureyellowgreen" => Self::PURE_YELLOW_GREEN,
            "beachsand" => Self::BEACH_SAND,
            "desertsand" => Self::DESERT_SAND,
            _ => return None,
        };
        Some(color)
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Channel-wise sum, clamped back into range.
    pub fn saturating_add(self, other: Self) -> Self {
        Self {
            r: (self.r + other.r).clamp(0.0, 1.0),
            g: (self.g + other.g).clamp(0.0, 1.0),
            b: (self.b + other.b).clamp(0.0, 1.0),
            a: (self.a + other.a).clamp(0.0, 1.0),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
