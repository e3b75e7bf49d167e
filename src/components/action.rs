//! Schedulable units of change.
//!
//! [`Action`] is a closed set of variants that all advance uniformly:
//!
//! - [`AnimateTo`] – interpolate a property to an absolute value
//! - [`AnimateBy`] – interpolate a property by a relative delta
//! - [`ActionGroup`] – run children in parallel, finish with the slowest one
//! - [`ActionSleep`] – wait
//! - [`LoopTimeline`] – replay a child [`Sequence`] a number of times
//!
//! Every advance returns a [`Progress`]. When an action finishes part-way
//! through a step, the unused part of `dt` comes back as `overflow` and is fed
//! straight into the next action, so the total duration of a schedule does not
//! depend on frame size.
//!
//! Property errors raised while advancing do not abort the schedule: the
//! offending action is skipped (it consumes no time) and an [`ActionFault`]
//! is recorded for the caller to report.

use crate::components::tween::{Easing, ease};
use crate::error::{ActionError, PropertyError};
use crate::resources::properties::{PropertyTarget, Value};

/// Result of advancing an action or sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Progress {
    /// Still running; all of `dt` was consumed.
    Running,
    /// Finished; `overflow` seconds of `dt` were left over.
    Finished { overflow: f32 },
}

impl Progress {
    pub fn is_finished(&self) -> bool {
        matches!(self, Progress::Finished { .. })
    }
}

/// A property error raised while advancing an action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionFault {
    pub target_type: &'static str,
    pub error: PropertyError,
}

fn check_duration(duration: f32) -> Result<f32, ActionError> {
    if duration.is_finite() && duration > 0.0 {
        Ok(duration)
    } else {
        Err(ActionError::InvalidDuration(duration))
    }
}

/// Shared progress state of the two animating actions.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub property: String,
    pub duration: f32,
    pub easing: Easing,
    pub elapsed: f32,
    pub completed: bool,
    start: Option<Value>,
    end: Option<Value>,
}

impl Track {
    fn new(property: String, duration: f32, easing: Easing) -> Result<Self, ActionError> {
        Ok(Self {
            property,
            duration: check_duration(duration)?,
            easing,
            elapsed: 0.0,
            completed: false,
            start: None,
            end: None,
        })
    }

    /// Value captured from the target when the animation began.
    pub fn start_value(&self) -> Option<&Value> {
        self.start.as_ref()
    }

    pub fn end_value(&self) -> Option<&Value> {
        self.end.as_ref()
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
        self.completed = false;
        self.start = None;
        self.end = None;
    }

    fn fault(&mut self, target: &dyn PropertyTarget, error: PropertyError, faults: &mut Vec<ActionFault>) {
        faults.push(ActionFault {
            target_type: target.type_name(),
            error,
        });
        self.completed = true;
    }

    fn advance(
        &mut self,
        dt: f32,
        target: &mut dyn PropertyTarget,
        faults: &mut Vec<ActionFault>,
        resolve_end: impl FnOnce(&str, &Value) -> Result<Value, PropertyError>,
    ) -> Progress {
        if self.completed {
            return Progress::Finished { overflow: dt };
        }
        if self.start.is_none() {
            let endpoints = target
                .get_property(&self.property)
                .and_then(|start| resolve_end(&self.property, &start).map(|end| (start, end)));
            match endpoints {
                Ok((start, end)) => {
                    self.start = Some(start);
                    self.end = Some(end);
                }
                Err(error) => {
                    self.fault(target, error, faults);
                    return Progress::Finished { overflow: dt };
                }
            }
        }
        let (Some(start), Some(end)) = (self.start.as_ref(), self.end.as_ref()) else {
            return Progress::Finished { overflow: dt };
        };

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            let overflow = (self.elapsed - self.duration).min(dt);
            self.elapsed = self.duration;
            // Land on the exact end value rather than an interpolated one.
            let result = target.set_property(&self.property, end.clone());
            self.completed = true;
            if let Err(error) = result {
                self.fault(target, error, faults);
            }
            return Progress::Finished { overflow };
        }

        let t = ease(self.easing, self.elapsed / self.duration);
        let result = target
            .interpolate_property(&self.property, start, end, t)
            .and_then(|value| target.set_property(&self.property, value));
        match result {
            Ok(()) => Progress::Running,
            Err(error) => {
                self.fault(target, error, faults);
                Progress::Finished { overflow: dt }
            }
        }
    }
}

fn same_kind(property: &str, start: &Value, other: &Value) -> Result<(), PropertyError> {
    if start.kind() == other.kind() {
        Ok(())
    } else {
        Err(PropertyError::TypeMismatch {
            property: property.to_string(),
            expected: start.kind(),
            found: other.kind(),
        })
    }
}

/// Interpolate a property from its current value to `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimateTo {
    pub target: Value,
    pub track: Track,
}

/// Interpolate a property from its current value `v` to `v + delta`.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimateBy {
    pub delta: Value,
    pub track: Track,
}

/// Run children concurrently; complete when every child has.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionGroup {
    pub children: Vec<Action>,
    pub completed: bool,
}

impl ActionGroup {
    pub fn add(&mut self, action: Action) -> &mut Action {
        self.children.push(action);
        self.completed = false;
        let last = self.children.len() - 1;
        &mut self.children[last]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionSleep {
    pub duration: f32,
    pub elapsed: f32,
    pub completed: bool,
}

impl ActionSleep {
    /// Change the delay. Negative or non-finite values are rejected.
    ///
    /// Time already slept past a shortened delay is dropped, not carried
    /// into the next action.
    pub fn set_duration(&mut self, duration: f32) -> Result<(), ActionError> {
        if !duration.is_finite() || duration < 0.0 {
            return Err(ActionError::InvalidDuration(duration));
        }
        self.duration = duration;
        self.elapsed = self.elapsed.min(duration);
        Ok(())
    }
}

/// Replays `sequence` `repeat` times; `-1` repeats forever.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopTimeline {
    pub sequence: Sequence,
    pub repeat: i32,
    remaining: i32,
    pub completed: bool,
}

impl LoopTimeline {
    pub const INFINITE: i32 = -1;

    pub fn is_infinite(&self) -> bool {
        self.repeat == Self::INFINITE
    }

    /// Passes left including the current one; `-1` when infinite.
    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    pub fn add(&mut self, action: Action) -> &mut Action {
        self.sequence.add(action)
    }

    fn advance(
        &mut self,
        dt: f32,
        target: &mut dyn PropertyTarget,
        faults: &mut Vec<ActionFault>,
    ) -> Progress {
        if self.completed || self.remaining == 0 {
            self.completed = true;
            return Progress::Finished { overflow: dt };
        }
        let mut budget = dt;
        loop {
            let fresh = self.sequence.is_fresh();
            match self.sequence.advance(budget, target, faults) {
                Progress::Running => return Progress::Running,
                Progress::Finished { overflow } => {
                    if self.remaining > 0 {
                        self.remaining -= 1;
                        if self.remaining == 0 {
                            self.completed = true;
                            return Progress::Finished { overflow };
                        }
                    } else if fresh && overflow >= budget {
                        // A whole pass took no time; stop spinning until the next frame.
                        self.sequence.reset();
                        return Progress::Running;
                    }
                    self.sequence.reset();
                    budget = overflow;
                }
            }
        }
    }

    fn reset(&mut self) {
        self.sequence.reset();
        self.remaining = self.repeat;
        self.completed = false;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    AnimateTo(AnimateTo),
    AnimateBy(AnimateBy),
    Group(ActionGroup),
    Sleep(ActionSleep),
    Loop(LoopTimeline),
}

impl Action {
    /// Animate `property` to `target` over `duration` seconds.
    pub fn animate_to(
        property: impl Into<String>,
        target: Value,
        duration: f32,
        easing: Easing,
    ) -> Result<Action, ActionError> {
        Ok(Action::AnimateTo(AnimateTo {
            target,
            track: Track::new(property.into(), duration, easing)?,
        }))
    }

    /// Animate `property` by `delta` over `duration` seconds.
    pub fn animate_by(
        property: impl Into<String>,
        delta: Value,
        duration: f32,
        easing: Easing,
    ) -> Result<Action, ActionError> {
        Ok(Action::AnimateBy(AnimateBy {
            delta,
            track: Track::new(property.into(), duration, easing)?,
        }))
    }

    pub fn sleep(duration: f32) -> Result<Action, ActionError> {
        let mut sleep = ActionSleep {
            duration: 0.0,
            elapsed: 0.0,
            completed: false,
        };
        sleep.set_duration(duration)?;
        Ok(Action::Sleep(sleep))
    }

    pub fn group(children: impl IntoIterator<Item = Action>) -> Action {
        Action::Group(ActionGroup {
            children: children.into_iter().collect(),
            completed: false,
        })
    }

    /// Loop `actions` `repeat` times, or forever with [`LoopTimeline::INFINITE`].
    pub fn repeat(
        repeat: i32,
        actions: impl IntoIterator<Item = Action>,
    ) -> Result<Action, ActionError> {
        if repeat < LoopTimeline::INFINITE {
            return Err(ActionError::InvalidRepeat(repeat));
        }
        Ok(Action::Loop(LoopTimeline {
            sequence: Sequence::from_actions(actions),
            repeat,
            remaining: repeat,
            completed: false,
        }))
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Action::AnimateTo(a) => a.track.completed,
            Action::AnimateBy(a) => a.track.completed,
            Action::Group(g) => g.completed,
            Action::Sleep(s) => s.completed,
            Action::Loop(l) => l.completed,
        }
    }

    /// Advance by `dt` seconds against `target`.
    pub fn advance(
        &mut self,
        dt: f32,
        target: &mut dyn PropertyTarget,
        faults: &mut Vec<ActionFault>,
    ) -> Progress {
        match self {
            Action::AnimateTo(a) => {
                let end = &a.target;
                a.track.advance(dt, target, faults, |property, start| {
                    same_kind(property, start, end)?;
                    Ok(end.clone())
                })
            }
            Action::AnimateBy(a) => {
                let delta = &a.delta;
                let type_name = target.type_name();
                a.track.advance(dt, target, faults, |property, start| {
                    same_kind(property, start, delta)?;
                    start
                        .checked_add(delta)
                        .ok_or_else(|| PropertyError::NotInterpolatable {
                            type_name,
                            property: property.to_string(),
                        })
                })
            }
            Action::Group(g) => {
                if g.completed {
                    return Progress::Finished { overflow: dt };
                }
                let mut overflow: Option<f32> = None;
                let mut all_done = true;
                for child in g.children.iter_mut().filter(|c| !c.is_complete()) {
                    match child.advance(dt, target, faults) {
                        Progress::Running => all_done = false,
                        Progress::Finished { overflow: o } => {
                            overflow = Some(overflow.map_or(o, |m| m.min(o)));
                        }
                    }
                }
                if !all_done {
                    return Progress::Running;
                }
                g.completed = true;
                Progress::Finished {
                    overflow: overflow.unwrap_or(dt),
                }
            }
            Action::Sleep(s) => {
                if s.completed {
                    return Progress::Finished { overflow: dt };
                }
                s.elapsed += dt;
                if s.elapsed >= s.duration {
                    // Never hand on more time than this step supplied.
                    let overflow = (s.elapsed - s.duration).min(dt);
                    s.elapsed = s.duration;
                    s.completed = true;
                    Progress::Finished { overflow }
                } else {
                    Progress::Running
                }
            }
            Action::Loop(l) => l.advance(dt, target, faults),
        }
    }

    /// Return to the not-yet-started state, recursively.
    pub fn reset(&mut self) {
        match self {
            Action::AnimateTo(a) => a.track.reset(),
            Action::AnimateBy(a) => a.track.reset(),
            Action::Group(g) => {
                g.completed = false;
                g.children.iter_mut().for_each(Action::reset);
            }
            Action::Sleep(s) => {
                s.elapsed = 0.0;
                s.completed = false;
            }
            Action::Loop(l) => l.reset(),
        }
    }

    fn is_untouched(&self) -> bool {
        match self {
            Action::AnimateTo(a) => a.track.start.is_none() && !a.track.completed,
            Action::AnimateBy(a) => a.track.start.is_none() && !a.track.completed,
            Action::Group(g) => !g.completed && g.children.iter().all(Action::is_untouched),
            Action::Sleep(s) => s.elapsed == 0.0 && !s.completed,
            Action::Loop(l) => !l.completed && l.remaining == l.repeat && l.sequence.is_fresh(),
        }
    }
}

/// Ordered actions with a cursor on the current one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sequence {
    actions: Vec<Action>,
    cursor: usize,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            cursor: 0,
        }
    }

    pub fn add(&mut self, action: Action) -> &mut Action {
        self.actions.push(action);
        let last = self.actions.len() - 1;
        &mut self.actions[last]
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut [Action] {
        &mut self.actions
    }

    /// Index of the current action; equals `len()` once complete.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.actions.len()
    }

    fn is_fresh(&self) -> bool {
        self.cursor == 0 && self.actions.first().is_none_or(Action::is_untouched)
    }

    /// Advance the current action, crossing as many boundaries as `dt` covers.
    pub fn advance(
        &mut self,
        dt: f32,
        target: &mut dyn PropertyTarget,
        faults: &mut Vec<ActionFault>,
    ) -> Progress {
        let mut remaining = dt;
        while let Some(action) = self.actions.get_mut(self.cursor) {
            match action.advance(remaining, target, faults) {
                Progress::Running => return Progress::Running,
                Progress::Finished { overflow } => {
                    remaining = overflow;
                    self.cursor += 1;
                }
            }
        }
        Progress::Finished {
            overflow: remaining,
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.actions.iter_mut().for_each(Action::reset);
    }
}
