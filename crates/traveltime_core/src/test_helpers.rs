//! Test helpers for common world setup.

use bevy_ecs::prelude::World;

use crate::clock::SimulationClock;
use crate::fleet::{Fleet, Vehicle, VehicleId};
use crate::network::{Link, LinkId, Network};
use crate::travel_time::TravelTimeRegistry;

/// Creates a world with the clock, fleet, network, and registry resources;
/// fleet and network start empty.
pub fn create_test_world() -> World {
    let mut world = World::new();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(Fleet::default());
    world.insert_resource(Network::default());
    world.insert_resource(TravelTimeRegistry::default());
    world
}

pub fn register_vehicle(world: &mut World, id: VehicleId) {
    world.resource_mut::<Fleet>().insert(Vehicle { id });
}

pub fn register_link(world: &mut World, id: LinkId) {
    world.resource_mut::<Network>().insert(Link { id });
}

/// Opens a measurement directly on the registry, bypassing event delivery.
///
/// # Panics
///
/// Panics if the vehicle or link is not registered.
pub fn open_measurement(world: &mut World, vehicle: VehicleId, link: LinkId, time: f64) {
    world.resource_scope(|world, mut registry: bevy_ecs::prelude::Mut<TravelTimeRegistry>| {
        let fleet = world.resource::<Fleet>();
        let network = world.resource::<Network>();
        registry
            .open(fleet, network, vehicle, link, time)
            .expect("vehicle and link should be registered");
    });
}
