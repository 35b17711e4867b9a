//! Data transfer objects for web requests and responses.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::controller::ShuttleItinerary;
use crate::domain::{Coordinate, DirectionsResult, RouteSegment, Step, TravelMode};
use crate::shuttle::{Campus, ScheduleEntry};

/// Request for point-to-point directions.
#[derive(Debug, Deserialize)]
pub struct DirectionsQuery {
    /// Origin as `lat,lng`
    pub origin: String,

    /// Destination as `lat,lng`
    pub destination: String,

    /// Travel mode (defaults to walking)
    pub mode: Option<String>,
}

/// Point-to-point directions.
#[derive(Debug, Serialize)]
pub struct DirectionsResponse {
    pub mode: TravelMode,
    pub polyline: Vec<Coordinate>,
    pub steps: Vec<Step>,
    pub distance_text: String,
    pub duration_text: String,
}

impl DirectionsResponse {
    pub fn from_result(mode: TravelMode, result: DirectionsResult) -> Self {
        Self {
            mode,
            polyline: result.polyline,
            steps: result.steps,
            distance_text: result.distance_text,
            duration_text: result.duration_text,
        }
    }
}

/// Request for upcoming shuttle departures.
#[derive(Debug, Deserialize)]
pub struct DeparturesQuery {
    /// Departure campus (`SGW` or `LOY`)
    pub campus: String,

    /// Maximum number of departures (default 3)
    pub count: Option<usize>,

    /// Instant as `YYYY-MM-DDTHH:MM` (defaults to now)
    pub at: Option<String>,
}

/// A single shuttle departure.
#[derive(Debug, Serialize)]
pub struct DepartureResult {
    /// Departure time, `HH:MM`
    pub label: String,
    pub is_last_bus: bool,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub from_campus: Campus,
    pub to_campus: Campus,
    /// e.g. "departs 18:30, last bus"
    pub description: String,
}

impl DepartureResult {
    pub fn from_entry(entry: &ScheduleEntry) -> Self {
        Self {
            label: entry.label.clone(),
            is_last_bus: entry.is_last_bus,
            departure_time: entry.departure_time,
            arrival_time: entry.arrival_time,
            from_campus: entry.from_campus,
            to_campus: entry.to_campus,
            description: entry.describe(),
        }
    }
}

/// Upcoming departures from one campus.
#[derive(Debug, Serialize)]
pub struct DeparturesResponse {
    pub campus: Campus,
    pub departures: Vec<DepartureResult>,
}

/// Request for the service status on a date.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Date as `YYYY-MM-DD` (defaults to today)
    pub date: Option<String>,
}

/// Whether the shuttle runs on a date.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub date: NaiveDate,
    pub operating: bool,
    /// `MON_THU`, `FRIDAY`, or absent on weekends
    pub schedule: Option<&'static str>,
    pub first_departure: Option<String>,
    pub last_departure: Option<String>,
}

/// Request for a shuttle itinerary.
#[derive(Debug, Deserialize)]
pub struct ItineraryQuery {
    /// Origin as `lat,lng`
    pub origin: String,

    /// Destination as `lat,lng`
    pub destination: String,

    /// Campus the trip starts from (`SGW` or `LOY`)
    pub campus: String,

    /// Departure instant as `YYYY-MM-DDTHH:MM` (defaults to now)
    pub at: Option<String>,
}

/// A composed shuttle itinerary.
#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    pub segments: Vec<RouteSegment>,
    pub steps: Vec<Step>,
    pub distance_text: String,
    pub duration_text: String,
    pub wait_minutes: i64,
    pub next_departure: DepartureResult,
}

impl ItineraryResponse {
    pub fn from_itinerary(itinerary: ShuttleItinerary) -> Self {
        Self {
            next_departure: DepartureResult::from_entry(&itinerary.next_departure),
            wait_minutes: itinerary.wait_secs / 60,
            segments: itinerary.segments,
            steps: itinerary.steps,
            distance_text: itinerary.distance_text,
            duration_text: itinerary.duration_text,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
