pub mod clock;
pub mod fleet;
pub mod network;
pub mod runner;
pub mod systems;
pub mod travel_time;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
