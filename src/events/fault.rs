//! Per-frame property faults.
//!
//! When an action references a property its target does not have (or feeds
//! it a value of the wrong kind), the action is skipped and a
//! [`PropertyFault`] is written to the `Messages<PropertyFault>` queue. The
//! frame carries on. Hosts read them back with
//! [`Simulation::drain_faults`](crate::simulation::Simulation::drain_faults).

use bevy_ecs::message::Message;
use log::warn;

use crate::components::action::ActionFault;
use crate::components::timeline::Target;
use crate::error::PropertyError;

#[derive(Message, Debug, Clone, PartialEq)]
pub struct PropertyFault {
    /// Object the failing timeline was bound to, if any.
    pub target: Option<Target>,
    /// Reflected type name of the target.
    pub target_type: &'static str,
    pub error: PropertyError,
}

impl PropertyFault {
    pub fn from_action(target: Option<Target>, fault: ActionFault) -> Self {
        warn!(
            "Skipped action on {} {:?}: {}",
            fault.target_type, target, fault.error
        );
        Self {
            target,
            target_type: fault.target_type,
            error: fault.error,
        }
    }
}
