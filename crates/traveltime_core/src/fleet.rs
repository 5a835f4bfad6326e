//! Fleet: resolves vehicle identifiers carried by events to registered
//! vehicles. Populated by the host scenario before event delivery starts.

use std::collections::HashMap;
use std::fmt;

use bevy_ecs::prelude::Resource;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VehicleId(pub u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vehicle {
    pub id: VehicleId,
}

#[derive(Debug, Default, Resource)]
pub struct Fleet {
    vehicles: HashMap<VehicleId, Vehicle>,
}

impl Fleet {
    pub fn insert(&mut self, vehicle: Vehicle) {
        self.vehicles.insert(vehicle.id, vehicle);
    }

    /// Resolves a vehicle identifier; `None` when the id was never registered.
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_vehicles_only() {
        let mut fleet = Fleet::default();
        fleet.insert(Vehicle { id: VehicleId(7) });

        assert!(fleet.vehicle(VehicleId(7)).is_some());
        assert!(fleet.vehicle(VehicleId(8)).is_none());
        assert_eq!(fleet.len(), 1);
    }
}
