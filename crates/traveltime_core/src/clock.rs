//! Event clock: orders traffic events by simulation time and hands them to
//! the runner one at a time.
//!
//! Timestamps are simulation time units as `f64`. The heap is a min-heap by
//! time, so popping yields events in non-decreasing time order regardless of
//! scheduling order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::Resource;

use crate::fleet::VehicleId;
use crate::network::LinkId;

/// Offset added to a [EventKind::VehicleEntersTraffic] timestamp before the
/// traversal of the injection link is opened, so that the injection link
/// measures zero dwell time relative to the injection event itself. Fixed by
/// the event protocol; not configurable.
pub const TRAFFIC_ENTER_OFFSET: f64 = 1.0;

/// Declaration order is the tie-break for events at the same timestamp: a
/// vehicle leaves its current link before it enters the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    /// Iteration boundary: all accumulated measurements are discarded.
    IterationStarted,
    /// A vehicle crossed off a link mid-route.
    LinkLeave,
    /// A vehicle was removed from the network; counts as leaving its last
    /// link, timestamp unmodified.
    VehicleLeavesTraffic,
    /// A vehicle crossed onto a link mid-route.
    LinkEnter,
    /// A vehicle was injected onto the network; counts as entering its first
    /// link, with [TRAFFIC_ENTER_OFFSET] applied to the timestamp.
    VehicleEntersTraffic,
}

/// The vehicle/link pair a traffic event concerns. Absent for
/// [EventKind::IterationStarted].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventSubject {
    pub vehicle: VehicleId,
    pub link: LinkId,
}

#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Every comparison is reversed so BinaryHeap pops the smallest event:
        // earliest time first, then smallest kind (boundary, then leaves,
        // then enters), then smallest subject.
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.kind.cmp(&self.kind))
            .then_with(|| other.subject.cmp(&self.subject))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The event currently being dispatched; inserted by the runner before each
/// schedule run.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: f64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn schedule(&mut self, event: Event) {
        debug_assert!(!event.time.is_nan(), "event timestamp must not be NaN");
        debug_assert!(
            event.time >= self.now,
            "event timestamp must be >= current time"
        );
        self.events.push(event);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.time;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<f64> {
        self.events.peek().map(|event| event.time)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
