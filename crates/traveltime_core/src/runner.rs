//! Event loop: advances the clock and routes events into the ECS.
//!
//! Each step pops the next event from [SimulationClock], inserts it as
//! [CurrentEvent], then runs the schedule. Delivery is strictly sequential;
//! a system finishes handling one event before the next is popped.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::systems::{
    iteration_started::iteration_started_system, link_enter::link_enter_system,
    link_leave::link_leave_system, vehicle_enters_traffic::vehicle_enters_traffic_system,
    vehicle_leaves_traffic::vehicle_leaves_traffic_system,
};

fn is_iteration_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::IterationStarted)
        .unwrap_or(false)
}

fn is_link_enter(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::LinkEnter)
        .unwrap_or(false)
}

fn is_link_leave(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::LinkLeave)
        .unwrap_or(false)
}

fn is_vehicle_enters_traffic(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::VehicleEntersTraffic)
        .unwrap_or(false)
}

fn is_vehicle_leaves_traffic(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::VehicleLeavesTraffic)
        .unwrap_or(false)
}

/// Runs one step: pops the next event, inserts it as [CurrentEvent], then
/// runs the schedule. Returns `false` when the clock is empty.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));

    schedule.run(world);
    true
}

/// Runs steps until the event queue is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Builds the default schedule: every event-reacting system, each gated on
/// its event kind so only one of them does work per step.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems((
        iteration_started_system.run_if(is_iteration_started),
        link_enter_system.run_if(is_link_enter),
        link_leave_system.run_if(is_link_leave),
        vehicle_enters_traffic_system.run_if(is_vehicle_enters_traffic),
        vehicle_leaves_traffic_system.run_if(is_vehicle_leaves_traffic),
    ));

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Event, EventSubject};
    use crate::fleet::VehicleId;
    use crate::network::LinkId;
    use crate::test_helpers::{create_test_world, register_link, register_vehicle};
    use crate::travel_time::TravelTimeRegistry;

    #[test]
    fn run_next_event_returns_false_on_empty_clock() {
        let mut world = create_test_world();
        let mut schedule = simulation_schedule();

        assert!(!run_next_event(&mut world, &mut schedule));
    }

    #[test]
    fn run_until_empty_processes_all_events() {
        let mut world = create_test_world();
        register_vehicle(&mut world, VehicleId(1));
        register_link(&mut world, LinkId(1));

        let subject = Some(EventSubject {
            vehicle: VehicleId(1),
            link: LinkId(1),
        });
        world.resource_mut::<SimulationClock>().schedule(Event {
            time: 10.0,
            kind: EventKind::LinkEnter,
            subject,
        });
        world.resource_mut::<SimulationClock>().schedule(Event {
            time: 15.0,
            kind: EventKind::LinkLeave,
            subject,
        });

        let mut schedule = simulation_schedule();
        assert_eq!(run_until_empty(&mut world, &mut schedule, 100), 2);

        let registry = world.resource::<TravelTimeRegistry>();
        assert_eq!(registry.len(), 1);
        let measurement = registry
            .vehicle_measurements(VehicleId(1))
            .next()
            .expect("measurement");
        assert_eq!(measurement.duration(), Some(5.0));
    }

    #[test]
    fn max_steps_bounds_the_run() {
        let mut world = create_test_world();
        register_vehicle(&mut world, VehicleId(1));
        register_link(&mut world, LinkId(1));

        for i in 0..5 {
            world.resource_mut::<SimulationClock>().schedule(Event {
                time: i as f64,
                kind: EventKind::IterationStarted,
                subject: None,
            });
        }

        let mut schedule = simulation_schedule();
        assert_eq!(run_until_empty(&mut world, &mut schedule, 3), 3);
        assert!(!world.resource::<SimulationClock>().is_empty());
    }
}
