//! A timeline drives one bound object through a [`Sequence`] of actions.

use crate::components::action::{Action, ActionFault, Progress, Sequence};
use crate::components::body::BodyHandle;
use crate::components::emitter::EmitterHandle;
use crate::pool::Poolable;
use crate::resources::properties::PropertyTarget;

/// Object a timeline animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Body(BodyHandle),
    Emitter(EmitterHandle),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimelineState {
    /// Built but never advanced.
    #[default]
    Idle,
    Running,
    Complete,
    /// The bound object went away; the timeline will never advance again.
    Inert,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    sequence: Sequence,
    target: Option<Target>,
    state: TimelineState,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            sequence: Sequence::from_actions(actions),
            ..Self::default()
        }
    }

    /// Append an action and return it for further tweaking.
    pub fn add(&mut self, action: Action) -> &mut Action {
        if self.state == TimelineState::Complete {
            self.state = TimelineState::Running;
        }
        self.sequence.add(action)
    }

    pub fn actions(&self) -> &[Action] {
        self.sequence.actions()
    }

    pub fn actions_mut(&mut self) -> &mut [Action] {
        self.sequence.actions_mut()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn bind(&mut self, target: Target) {
        self.target = Some(target);
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Complete timelines and inert ones are both done.
    pub fn is_complete(&self) -> bool {
        matches!(self.state, TimelineState::Complete | TimelineState::Inert)
    }

    pub fn mark_inert(&mut self) {
        self.state = TimelineState::Inert;
    }

    /// Advance by `dt` seconds against `target`.
    pub fn advance(
        &mut self,
        dt: f32,
        target: &mut dyn PropertyTarget,
        faults: &mut Vec<ActionFault>,
    ) -> Progress {
        match self.state {
            TimelineState::Complete | TimelineState::Inert => {
                return Progress::Finished { overflow: dt };
            }
            TimelineState::Idle => self.state = TimelineState::Running,
            TimelineState::Running => {}
        }
        let progress = self.sequence.advance(dt, target, faults);
        if progress.is_finished() {
            self.state = TimelineState::Complete;
        }
        progress
    }

    /// Rewind every action to its not-yet-started state.
    pub fn reset(&mut self) {
        self.sequence.reset();
        if self.state != TimelineState::Inert {
            self.state = TimelineState::Idle;
        }
    }
}

impl Poolable for Timeline {}
