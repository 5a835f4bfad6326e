pub mod iteration_started;
pub mod link_enter;
pub mod link_leave;
pub mod vehicle_enters_traffic;
pub mod vehicle_leaves_traffic;
