//! Timed spawner of bodies cloned from a prototype.
//!
//! Every `interval` seconds an [`Emitter`] fires one *tick*. A tick clones the
//! prototype body once (`Point`) or `way_number` times around a ring
//! (`Annular`). `emitted_number` is the remaining tick budget; `-1` means
//! unlimited.
//!
//! When one frame spans several intervals, [`Emitter::due_ticks`] reports the
//! age of each tick (how long ago within the frame it fired) so the spawner
//! can fast-forward each clone by that much instead of stacking them all at
//! the same spot.
//!
//! # Related
//!
//! - [`crate::systems::emitter::emitter_system`] – drives emitters each frame

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::body::{Body, BodyHandle};
use crate::error::PropertyError;
use crate::geometry::Vector2;
use crate::pool::{Handle, Poolable};
use crate::resources::properties::{PropertyTable, Reflect};

pub type EmitterHandle = Handle<Emitter>;

/// Per-spawn customization hook.
pub type BodyCreated = Arc<dyn Fn(&EmitterView, &mut Body) + Send + Sync>;

/// Tolerance when counting whole intervals, so `n * interval` worth of time
/// yields `n` ticks despite rounding.
const TICK_EPSILON: f32 = 1e-4;

/// `emitted_number` value for an emitter that never runs out.
pub const UNLIMITED: i32 = -1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmitterPattern {
    /// One clone per tick.
    #[default]
    Point,
    /// `way_number` clones per tick spread evenly around a ring of `radius`.
    Annular,
}

/// What a [`BodyCreated`] callback learns about the spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmitterView {
    pub handle: EmitterHandle,
    /// Index of the tick within the current frame.
    pub tick: u32,
    /// Index of the clone within its tick.
    pub way: u32,
    /// Bodies spawned by this emitter before this one.
    pub spawned_total: u64,
}

#[derive(Clone)]
pub struct Emitter {
    pub prototype: Option<BodyHandle>,
    pub pattern: EmitterPattern,
    interval: f32,
    /// Remaining ticks; `-1` is unlimited.
    emitted_number: i32,
    way_number: u32,
    /// Ring radius for annular patterns.
    pub radius: f32,
    /// Heading added to the prototype's angle.
    pub angle: f32,
    /// Spawn offset from the prototype's position.
    pub position: Vector2,
    pub on_body_created: Option<BodyCreated>,
    accumulated: f32,
    spawned_total: u64,
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("prototype", &self.prototype)
            .field("pattern", &self.pattern)
            .field("interval", &self.interval)
            .field("emitted_number", &self.emitted_number)
            .field("way_number", &self.way_number)
            .field("radius", &self.radius)
            .field("angle", &self.angle)
            .field("position", &self.position)
            .field("on_body_created", &self.on_body_created.is_some())
            .field("accumulated", &self.accumulated)
            .field("spawned_total", &self.spawned_total)
            .finish()
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            prototype: None,
            pattern: EmitterPattern::Point,
            interval: 1.0,
            emitted_number: UNLIMITED,
            way_number: 1,
            radius: 0.0,
            angle: 0.0,
            position: Vector2::zero(),
            on_body_created: None,
            accumulated: 0.0,
            spawned_total: 0,
        }
    }
}

impl Emitter {
    pub fn point(prototype: BodyHandle, interval: f32) -> Result<Self, PropertyError> {
        let mut emitter = Self {
            prototype: Some(prototype),
            ..Self::default()
        };
        emitter.set_interval(interval)?;
        Ok(emitter)
    }

    pub fn annular(
        prototype: BodyHandle,
        interval: f32,
        way_number: u32,
    ) -> Result<Self, PropertyError> {
        let mut emitter = Self::point(prototype, interval)?;
        emitter.pattern = EmitterPattern::Annular;
        emitter.set_way_number(way_number);
        Ok(emitter)
    }

    pub fn with_budget(mut self, emitted_number: i32) -> Result<Self, PropertyError> {
        self.set_emitted_number(emitted_number)?;
        Ok(self)
    }

    pub fn with_callback(
        mut self,
        callback: impl Fn(&EmitterView, &mut Body) + Send + Sync + 'static,
    ) -> Self {
        self.on_body_created = Some(Arc::new(callback));
        self
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Seconds between ticks. Must be positive and finite.
    pub fn set_interval(&mut self, interval: f32) -> Result<(), PropertyError> {
        self.try_interval(interval)
            .map_err(|reason| PropertyError::InvalidValue {
                property: "Interval".to_string(),
                reason,
            })
    }

    fn try_interval(&mut self, interval: f32) -> Result<(), String> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(format!("interval must be positive, got {}", interval));
        }
        self.interval = interval;
        Ok(())
    }

    pub fn emitted_number(&self) -> i32 {
        self.emitted_number
    }

    /// Remaining tick budget. `-1` is unlimited; anything lower is rejected.
    pub fn set_emitted_number(&mut self, emitted_number: i32) -> Result<(), PropertyError> {
        self.try_emitted_number(emitted_number)
            .map_err(|reason| PropertyError::InvalidValue {
                property: "EmittedNumber".to_string(),
                reason,
            })
    }

    fn try_emitted_number(&mut self, emitted_number: i32) -> Result<(), String> {
        if emitted_number < UNLIMITED {
            return Err(format!("budget must be -1 or more, got {}", emitted_number));
        }
        self.emitted_number = emitted_number;
        Ok(())
    }

    pub fn way_number(&self) -> u32 {
        self.way_number
    }

    /// At least one clone per tick.
    pub fn set_way_number(&mut self, way_number: u32) {
        self.way_number = way_number.max(1);
    }

    /// Clones produced by one tick.
    pub fn spawns_per_tick(&self) -> u32 {
        match self.pattern {
            EmitterPattern::Point => 1,
            EmitterPattern::Annular => self.way_number,
        }
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    pub fn is_exhausted(&self) -> bool {
        self.emitted_number == 0
    }

    /// Accumulate `dt` and return the age of every tick that fired, oldest
    /// first. Consumes the tick budget.
    pub fn due_ticks(&mut self, dt: f32) -> SmallVec<[f32; 8]> {
        let mut ages = SmallVec::new();
        if self.is_exhausted() {
            return ages;
        }
        self.accumulated += dt;
        let mut count = (self.accumulated / self.interval + TICK_EPSILON).floor() as i64;
        if self.emitted_number > 0 {
            count = count.min(self.emitted_number as i64);
        }
        for k in 1..=count {
            ages.push((self.accumulated - self.interval * k as f32).max(0.0));
        }
        self.accumulated = (self.accumulated - self.interval * count as f32).max(0.0);
        if self.emitted_number > 0 {
            self.emitted_number -= count as i32;
            if self.emitted_number == 0 {
                self.accumulated = 0.0;
            }
        }
        ages
    }

    /// Position and aim a fresh clone for slot `way` of a tick.
    pub fn place(&self, body: &mut Body, way: u32) {
        let origin = body.position + self.position;
        let mut heading = body.angle() + self.angle;
        match self.pattern {
            EmitterPattern::Point => body.position = origin,
            EmitterPattern::Annular => {
                heading += way as f32 * 360.0 / self.way_number as f32;
                body.position = origin + Vector2::from_angle(heading).scale_by(self.radius);
            }
        }
        body.set_angle(heading);
    }

    /// Record one spawn and describe it for the callback.
    pub fn record_spawn(&mut self, handle: EmitterHandle, tick: u32, way: u32) -> EmitterView {
        let view = EmitterView {
            handle,
            tick,
            way,
            spawned_total: self.spawned_total,
        };
        self.spawned_total += 1;
        view
    }
}

impl Poolable for Emitter {}

impl Reflect for Emitter {
    const TYPE_NAME: &'static str = "Emitter";

    fn register_properties(table: &mut PropertyTable<Self>) -> Result<(), PropertyError> {
        table.add(
            "Position",
            |e: &Emitter| e.position,
            |e: &mut Emitter, v: Vector2| e.position = v,
        )?;
        table.add_checked("Interval", Emitter::interval, Emitter::try_interval)?;
        table.add_checked("EmittedNumber", Emitter::emitted_number, Emitter::try_emitted_number)?;
        table.add(
            "WayNumber",
            |e: &Emitter| e.way_number as i32,
            |e: &mut Emitter, v: i32| e.set_way_number(v.max(1) as u32),
        )?;
        table.add("Radius", |e: &Emitter| e.radius, |e: &mut Emitter, v: f32| e.radius = v)?;
        table.add("Angle", |e: &Emitter| e.angle, |e: &mut Emitter, v: f32| e.angle = v)?;
        Ok(())
    }
}
