use bevy_ecs::prelude::*;

use crate::events::fault::PropertyFault;

/// Advance the ECS message queue for [`PropertyFault`].
///
/// Bevy ECS' [`Messages`] API requires calling `update()` once per frame;
/// faults older than two frames are dropped unless drained first.
pub fn update_property_faults(mut faults: ResMut<Messages<PropertyFault>>) {
    faults.update();
}
