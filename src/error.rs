//! Error types for the simulation core.
//!
//! - [`PropertyError`] – named property access failures (registration time
//!   and per-frame)
//! - [`PoolError`] – object lifecycle violations
//! - [`ActionError`] – malformed actions rejected at construction time
//! - [`SimError`] – umbrella type returned by the [`Simulation`](crate::simulation::Simulation) facade

use thiserror::Error;

use crate::pool::Lifecycle;
use crate::resources::properties::ValueKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    #[error("property '{property}' is not registered for {type_name}")]
    UnknownProperty {
        type_name: &'static str,
        property: String,
    },
    #[error("property '{property}' expects {expected:?}, got {found:?}")]
    TypeMismatch {
        property: String,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("property '{property}' of {type_name} has no interpolator")]
    NotInterpolatable {
        type_name: &'static str,
        property: String,
    },
    #[error("property '{property}' is already registered for {type_name}")]
    DuplicateProperty {
        type_name: &'static str,
        property: String,
    },
    #[error("property '{property}' of {type_name} is write-only")]
    NotReadable {
        type_name: &'static str,
        property: String,
    },
    #[error("property '{property}' of {type_name} is read-only")]
    NotWritable {
        type_name: &'static str,
        property: String,
    },
    #[error("invalid value for '{property}': {reason}")]
    InvalidValue { property: String, reason: String },
}

impl PropertyError {
    /// Name of the property the error refers to.
    pub fn property(&self) -> &str {
        match self {
            PropertyError::UnknownProperty { property, .. }
            | PropertyError::TypeMismatch { property, .. }
            | PropertyError::NotInterpolatable { property, .. }
            | PropertyError::DuplicateProperty { property, .. }
            | PropertyError::NotReadable { property, .. }
            | PropertyError::NotWritable { property, .. }
            | PropertyError::InvalidValue { property, .. } => property,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("double free of pool slot {index}")]
    DoubleFree { index: u32 },
    #[error("use of destroyed pool slot {index}")]
    UseAfterDestroy { index: u32 },
    #[error("pool slot {index} cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        index: u32,
        from: Lifecycle,
        to: Lifecycle,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("action duration must be positive and finite, got {0}")]
    InvalidDuration(f32),
    #[error("loop repeat count must be -1 (infinite) or non-negative, got {0}")]
    InvalidRepeat(i32),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("no object named '{0}'")]
    UnknownObject(String),
}
