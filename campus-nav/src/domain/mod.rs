//! Domain types for campus navigation.
//!
//! Coordinates and their geometry, the route/step model shared by every
//! directions backend, and the display-text conversions used when legs are
//! combined into one itinerary.

mod coordinate;
mod route;
mod text;

pub use coordinate::{
    Coordinate, EARTH_RADIUS_M, distance_meters, min_distance_to_polyline, to_radians,
};
pub use route::{
    DirectionsResult, InvalidTravelMode, LegTag, RouteSegment, Step, TravelMode, route_path,
};
pub use text::{
    DEFAULT_DURATION_SECS, format_distance, format_duration, parse_distance_meters,
    parse_duration_secs,
};
