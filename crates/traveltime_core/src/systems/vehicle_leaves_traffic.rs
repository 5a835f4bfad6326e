use bevy_ecs::prelude::{Res, ResMut};
use tracing::warn;

use crate::clock::{CurrentEvent, EventKind};
use crate::fleet::Fleet;
use crate::network::Network;
use crate::travel_time::TravelTimeRegistry;

/// Removal from the network counts as leaving the last link; the timestamp is
/// used as delivered.
pub fn vehicle_leaves_traffic_system(
    event: Res<CurrentEvent>,
    fleet: Res<Fleet>,
    network: Res<Network>,
    mut registry: ResMut<TravelTimeRegistry>,
) {
    if event.0.kind != EventKind::VehicleLeavesTraffic {
        return;
    }
    let Some(subject) = event.0.subject else {
        return;
    };

    if let Err(reason) =
        registry.close(&fleet, &network, subject.vehicle, subject.link, event.0.time)
    {
        warn!(
            %reason,
            vehicle = %subject.vehicle,
            link = %subject.link,
            time = event.0.time,
            "ignoring vehicle leaves traffic event"
        );
    }
}
