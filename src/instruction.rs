//! Data-driven instructions for external loaders.
//!
//! A loader (a bullet script parser, a level file, a test) describes what to
//! do to named objects without touching the object types. Instructions are
//! plain serde data; a script is a JSON array of them:
//!
//! ```json
//! [
//!   { "op": "set", "object": "ProBody", "property": "Speed", "value": { "Float": 120.0 } },
//!   { "op": "animate_to", "object": "ProBody", "property": "Opacity",
//!     "to": { "Float": 0.5 }, "duration": 0.2, "easing": "SineOut" },
//!   { "op": "sleep", "object": "ProBody", "duration": 1.0 }
//! ]
//! ```
//!
//! `set` applies immediately. The other instructions append to the object's
//! script timeline, which is created on first use and runs like any other
//! free timeline. See [`Simulation::apply_instruction`](crate::simulation::Simulation::apply_instruction).

use serde::{Deserialize, Serialize};

use crate::components::action::Action;
use crate::components::tween::Easing;
use crate::error::ActionError;
use crate::resources::properties::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    Set {
        object: String,
        property: String,
        value: Value,
    },
    AnimateTo {
        object: String,
        property: String,
        to: Value,
        duration: f32,
        #[serde(default)]
        easing: Easing,
    },
    AnimateBy {
        object: String,
        property: String,
        by: Value,
        duration: f32,
        #[serde(default)]
        easing: Easing,
    },
    Sleep {
        object: String,
        duration: f32,
    },
}

impl Instruction {
    /// Name of the object the instruction addresses.
    pub fn object(&self) -> &str {
        match self {
            Instruction::Set { object, .. }
            | Instruction::AnimateTo { object, .. }
            | Instruction::AnimateBy { object, .. }
            | Instruction::Sleep { object, .. } => object,
        }
    }

    /// The action this instruction schedules, or `None` for `set`.
    pub fn to_action(&self) -> Result<Option<Action>, ActionError> {
        match self {
            Instruction::Set { .. } => Ok(None),
            Instruction::AnimateTo {
                property,
                to,
                duration,
                easing,
                ..
            } => Action::animate_to(property.clone(), to.clone(), *duration, *easing).map(Some),
            Instruction::AnimateBy {
                property,
                by,
                duration,
                easing,
                ..
            } => Action::animate_by(property.clone(), by.clone(), *duration, *easing).map(Some),
            Instruction::Sleep { duration, .. } => Action::sleep(*duration).map(Some),
        }
    }
}

/// Parse a JSON array of instructions.
pub fn parse_script(json: &str) -> Result<Vec<Instruction>, serde_json::Error> {
    serde_json::from_str(json)
}
