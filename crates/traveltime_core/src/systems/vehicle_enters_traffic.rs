use bevy_ecs::prelude::{Res, ResMut};
use tracing::warn;

use crate::clock::{CurrentEvent, EventKind, TRAFFIC_ENTER_OFFSET};
use crate::fleet::Fleet;
use crate::network::Network;
use crate::travel_time::TravelTimeRegistry;

/// Injection onto the network counts as entering the first link. The fixed
/// [TRAFFIC_ENTER_OFFSET] is applied exactly once, here, so the injection
/// link measures zero dwell relative to the injection event itself.
pub fn vehicle_enters_traffic_system(
    event: Res<CurrentEvent>,
    fleet: Res<Fleet>,
    network: Res<Network>,
    mut registry: ResMut<TravelTimeRegistry>,
) {
    if event.0.kind != EventKind::VehicleEntersTraffic {
        return;
    }
    let Some(subject) = event.0.subject else {
        return;
    };

    let time = event.0.time + TRAFFIC_ENTER_OFFSET;
    if let Err(reason) = registry.open(&fleet, &network, subject.vehicle, subject.link, time) {
        warn!(
            %reason,
            vehicle = %subject.vehicle,
            link = %subject.link,
            time = event.0.time,
            "ignoring vehicle enters traffic event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::Schedule;

    use crate::clock::{Event, EventSubject};
    use crate::fleet::VehicleId;
    use crate::network::LinkId;
    use crate::test_helpers::{create_test_world, register_link, register_vehicle};

    #[test]
    fn traffic_enter_opens_with_offset_applied_once() {
        let mut world = create_test_world();
        register_vehicle(&mut world, VehicleId(1));
        register_link(&mut world, LinkId(1));

        world.insert_resource(CurrentEvent(Event {
            time: 100.0,
            kind: EventKind::VehicleEntersTraffic,
            subject: Some(EventSubject {
                vehicle: VehicleId(1),
                link: LinkId(1),
            }),
        }));
        let mut schedule = Schedule::default();
        schedule.add_systems(vehicle_enters_traffic_system);
        schedule.run(&mut world);

        let registry = world.resource::<TravelTimeRegistry>();
        let measurement = registry
            .vehicle_measurements(VehicleId(1))
            .next()
            .expect("measurement");
        assert_eq!(measurement.enter_time, 101.0);
        assert!(measurement.is_open());
    }
}
