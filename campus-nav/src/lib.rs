//! Campus navigation core.
//!
//! Point-to-point directions with debounced fetching and off-route
//! recalculation, plus inter-campus shuttle itineraries composed from a fixed
//! weekday timetable and three independently fetched legs.

pub mod cache;
pub mod controller;
pub mod directions;
pub mod domain;
pub mod shuttle;
pub mod web;
