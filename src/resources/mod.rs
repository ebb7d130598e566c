//! Per-family endpoint bindings, filters and specialized operations built
//! on the generic list controller.

pub mod companies;
pub mod dates;
pub mod progress;
pub mod stages;
pub mod students;
pub mod users;
