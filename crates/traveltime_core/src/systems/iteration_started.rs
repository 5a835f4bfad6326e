use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::travel_time::TravelTimeRegistry;

/// Iteration boundary: discards every measurement accumulated during the
/// previous iteration. The host signals the boundary before delivering any
/// events of the new iteration.
pub fn iteration_started_system(
    event: Res<CurrentEvent>,
    mut registry: ResMut<TravelTimeRegistry>,
) {
    if event.0.kind != EventKind::IterationStarted {
        return;
    }

    registry.reset();
}
