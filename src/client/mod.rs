//! Client side of the planner: API access, view state, forms and the
//! overview figures the trip pages show.

pub mod api;
pub mod forms;
pub mod overview;
pub mod view;
