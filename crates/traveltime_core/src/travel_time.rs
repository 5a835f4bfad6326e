//! Travel-time tracking: correlates link enter/leave events into
//! per-traversal measurements, queryable by vehicle and by link.
//!
//! Measurements live in a single arena; both indices store handles into it,
//! so a traversal closed via the by-vehicle path is immediately visible from
//! the by-link view without duplicating the record. All state is discarded at
//! iteration boundaries via [TravelTimeRegistry::reset].

use std::collections::HashMap;
use std::fmt;

use bevy_ecs::prelude::Resource;
use serde::Serialize;
use thiserror::Error;

use crate::fleet::{Fleet, VehicleId};
use crate::network::{LinkId, Network};

/// One traversal of one link by one vehicle. Created when the vehicle enters
/// the link; `leave_time` stays `None` while the traversal is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub link: LinkId,
    pub enter_time: f64,
    pub leave_time: Option<f64>,
}

impl Measurement {
    pub fn is_open(&self) -> bool {
        self.leave_time.is_none()
    }

    /// Dwell time on the link; `None` while the traversal is still open.
    pub fn duration(&self) -> Option<f64> {
        self.leave_time.map(|leave| leave - self.enter_time)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.leave_time {
            Some(leave) => write!(
                f,
                "({} | {} | {} | {})",
                self.link,
                self.enter_time,
                leave,
                leave - self.enter_time
            ),
            None => write!(f, "({} | {} | - | -)", self.link, self.enter_time),
        }
    }
}

/// Stable handle into the measurement arena. Valid until the next
/// [TravelTimeRegistry::reset].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasurementId(usize);

/// Why an event was dropped instead of opening or closing a measurement.
/// Every drop is recoverable: the event is discarded, the registry is left
/// untouched, and processing continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DropReason {
    #[error("{0} is not registered in the fleet")]
    UnresolvedVehicle(VehicleId),
    #[error("{0} is not part of the network")]
    UnresolvedLink(LinkId),
    #[error("no open measurement tracked for {0}")]
    NoOpenMeasurement(VehicleId),
    #[error("open measurement for {vehicle} is on {open_link}, leave event names {event_link}")]
    LinkMismatch {
        vehicle: VehicleId,
        open_link: LinkId,
        event_link: LinkId,
    },
}

/// Registry of in-flight and completed measurements for one iteration.
///
/// Events are expected in non-decreasing time order; a vehicle occupies at
/// most one link at a time, so the tail of its history is always the
/// traversal a leave event may close.
#[derive(Debug, Default, Resource)]
pub struct TravelTimeRegistry {
    measurements: Vec<Measurement>,
    by_vehicle: HashMap<VehicleId, Vec<MeasurementId>>,
    by_link: HashMap<LinkId, Vec<MeasurementId>>,
}

impl TravelTimeRegistry {
    /// Opens a new measurement for `vehicle_id` entering `link_id` at `time`
    /// and files it under both indices. The only path that creates
    /// measurements.
    pub fn open(
        &mut self,
        fleet: &Fleet,
        network: &Network,
        vehicle_id: VehicleId,
        link_id: LinkId,
        time: f64,
    ) -> Result<MeasurementId, DropReason> {
        if fleet.vehicle(vehicle_id).is_none() {
            return Err(DropReason::UnresolvedVehicle(vehicle_id));
        }
        let link = network
            .link(link_id)
            .ok_or(DropReason::UnresolvedLink(link_id))?;

        let id = MeasurementId(self.measurements.len());
        self.measurements.push(Measurement {
            link: link.id,
            enter_time: time,
            leave_time: None,
        });

        let history = self.by_vehicle.entry(vehicle_id).or_default();
        debug_assert!(
            history
                .last()
                .map_or(true, |prev| self.measurements[prev.0].leave_time.is_some()),
            "vehicle entered a link while its previous traversal is still open"
        );
        history.push(id);
        self.by_link.entry(link.id).or_default().push(id);

        Ok(id)
    }

    /// Closes the most recently opened measurement of `vehicle_id`, which
    /// must be on `link_id`. The only path that sets `leave_time`. Earlier
    /// entries of the vehicle's history are never searched: the event
    /// protocol admits only the tail as a match, so a mismatched tail means a
    /// malformed or out-of-order stream and the event is dropped.
    pub fn close(
        &mut self,
        fleet: &Fleet,
        network: &Network,
        vehicle_id: VehicleId,
        link_id: LinkId,
        time: f64,
    ) -> Result<MeasurementId, DropReason> {
        if fleet.vehicle(vehicle_id).is_none() {
            return Err(DropReason::UnresolvedVehicle(vehicle_id));
        }
        let link = network
            .link(link_id)
            .ok_or(DropReason::UnresolvedLink(link_id))?;

        let Some(&id) = self.by_vehicle.get(&vehicle_id).and_then(|h| h.last()) else {
            return Err(DropReason::NoOpenMeasurement(vehicle_id));
        };

        let measurement = &mut self.measurements[id.0];
        if measurement.link != link.id {
            return Err(DropReason::LinkMismatch {
                vehicle: vehicle_id,
                open_link: measurement.link,
                event_link: link.id,
            });
        }

        measurement.leave_time = Some(time);
        Ok(id)
    }

    /// Discards all measurements and both indices. Called at each iteration
    /// boundary; idempotent.
    pub fn reset(&mut self) {
        self.measurements.clear();
        self.by_vehicle.clear();
        self.by_link.clear();
    }

    pub fn measurement(&self, id: MeasurementId) -> Option<&Measurement> {
        self.measurements.get(id.0)
    }

    /// The vehicle's traversals in the order they were opened. The last
    /// element is its currently open (or most recently closed) traversal.
    pub fn vehicle_measurements(
        &self,
        vehicle: VehicleId,
    ) -> impl Iterator<Item = &Measurement> + '_ {
        self.by_vehicle
            .get(&vehicle)
            .into_iter()
            .flatten()
            .map(|id| &self.measurements[id.0])
    }

    /// Traversals of the link across all vehicles, in the order they were
    /// opened.
    pub fn link_measurements(&self, link: LinkId) -> impl Iterator<Item = &Measurement> + '_ {
        self.by_link
            .get(&link)
            .into_iter()
            .flatten()
            .map(|id| &self.measurements[id.0])
    }

    pub fn vehicle_ids(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.by_vehicle.keys().copied()
    }

    pub fn link_ids(&self) -> impl Iterator<Item = LinkId> + '_ {
        self.by_link.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}
