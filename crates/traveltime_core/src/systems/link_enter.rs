use bevy_ecs::prelude::{Res, ResMut};
use tracing::warn;

use crate::clock::{CurrentEvent, EventKind};
use crate::fleet::Fleet;
use crate::network::Network;
use crate::travel_time::TravelTimeRegistry;

pub fn link_enter_system(
    event: Res<CurrentEvent>,
    fleet: Res<Fleet>,
    network: Res<Network>,
    mut registry: ResMut<TravelTimeRegistry>,
) {
    if event.0.kind != EventKind::LinkEnter {
        return;
    }
    let Some(subject) = event.0.subject else {
        return;
    };

    if let Err(reason) = registry.open(&fleet, &network, subject.vehicle, subject.link, event.0.time)
    {
        warn!(
            %reason,
            vehicle = %subject.vehicle,
            link = %subject.link,
            time = event.0.time,
            "ignoring link enter event"
        );
    }
}
