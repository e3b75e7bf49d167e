//! Easing curves for timeline animations.
//!
//! An [`Easing`] maps normalized time `t` in `[0, 1]` onto animation
//! progress. Every curve starts at 0 and ends exactly at 1, so an animation
//! always lands on its target. See [`crate::components::action`] for the
//! actions that use them.

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Easing functions for smooth interpolation.
///
/// These functions transform a linear `t` value (0.0 to 1.0) to create
/// different acceleration/deceleration curves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    /// Constant speed (no easing).
    #[default]
    Linear,
    /// Starts slow, accelerates (quadratic).
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    QuadOut,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    CubicIn,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Slow start and end (cubic).
    CubicInOut,
    /// Quarter sine wave, accelerating.
    SineIn,
    /// Quarter sine wave, decelerating.
    SineOut,
    /// Half sine wave, slow start and end.
    SineInOut,
    /// Exponential acceleration.
    ExponentialIn,
    /// Exponential deceleration.
    ExponentialOut,
    /// Smoothstep (`3t² - 2t³`).
    Smooth,
}

impl Easing {
    pub const ALL: [Easing; 13] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::ExponentialIn,
        Easing::ExponentialOut,
        Easing::Smooth,
    ];

    /// Apply this curve to `t`; see [`ease`].
    pub fn apply(self, t: f32) -> f32 {
        ease(self, t)
    }
}

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
        Easing::SineIn => 1.0 - (t * PI * 0.5).cos(),
        Easing::SineOut => (t * PI * 0.5).sin(),
        Easing::SineInOut => 0.5 * (1.0 - (t * PI).cos()),
        // The pure exponentials never reach their endpoints; pin them.
        Easing::ExponentialIn => {
            if t <= 0.0 {
                0.0
            } else {
                2f32.powf(10.0 * (t - 1.0))
            }
        }
        Easing::ExponentialOut => {
            if t >= 1.0 {
                1.0
            } else {
                1.0 - 2f32.powf(-10.0 * t)
            }
        }
        Easing::Smooth => t * t * (3.0 - 2.0 * t),
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Easing {
    type Err = String;

    /// Parse a curve name. Accepts the variant names and the short `IF_` style
    /// aliases used by spellbook files (`"SineOut"`, `"IF_SineOut"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("IF_").unwrap_or(s);
        Easing::ALL
            .into_iter()
            .find(|e| e.to_string().eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("Unknown easing curve '{}'", s))
    }
}
