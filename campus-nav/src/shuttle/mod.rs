//! Inter-campus shuttle reference data and timetable queries.
//!
//! The shuttle runs on a fixed weekday timetable (Monday to Thursday share
//! one table, Friday has its own, weekends have none). Nothing here touches
//! the network; the itinerary composer in `controller` combines these
//! lookups with walking directions.

mod campus;
mod schedule;

pub use campus::{Campus, InvalidCampus, ShuttleStop, ShuttleStops, concordia_stops};
pub use schedule::{
    DepartureTime, SHUTTLE_TRAVEL_MINUTES, ScheduleEntry, ScheduleKey, TimeError, Timetable,
    is_operating,
};
