//! Three-leg shuttle itineraries: walk to the stop, ride, walk on.
//!
//! The walk to the stop is fetched first because its duration decides which
//! bus the traveller can catch. The ride and the final walk do not depend on
//! each other and are fetched together.

use chrono::{Duration, NaiveDateTime};
use futures::future::try_join;
use tracing::{debug, info};

use crate::directions::{DirectionsError, DirectionsProvider};
use crate::domain::{
    Coordinate, DirectionsResult, LegTag, RouteSegment, Step, TravelMode, format_distance,
    format_duration, parse_distance_meters, parse_duration_secs,
};
use crate::shuttle::{Campus, ScheduleEntry, ShuttleStops, Timetable};

use super::state::FALLBACK_ERROR_MESSAGE;

pub const WALK_TO_STOP_ID: &str = "walk-to-stop";
pub const SHUTTLE_ID: &str = "shuttle";
pub const WALK_FROM_STOP_ID: &str = "walk-from-stop";

/// Errors from composing a shuttle itinerary.
#[derive(Debug, thiserror::Error)]
pub enum ItineraryError {
    #[error("Shuttle stop info missing.")]
    MissingStopInfo,

    #[error("Shuttle does not operate today.")]
    NotOperating,

    #[error("No more shuttle buses today after you arrive.")]
    NoMoreDepartures,

    /// A leg came back empty or with an unusable duration
    #[error("Failed to fetch directions.")]
    LegUnavailable,

    #[error(transparent)]
    Directions(#[from] DirectionsError),
}

impl ItineraryError {
    /// Text for the published `error` field.
    ///
    /// Any failed leg reads the same; the provider's own detail is logged, not shown.
    pub fn user_message(&self) -> String {
        match self {
            ItineraryError::Directions(_) => FALLBACK_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// What to compose: the real endpoints and the campus the trip starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItineraryRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub origin_campus: Campus,
}

impl ItineraryRequest {
    pub fn new(origin: Coordinate, destination: Coordinate, origin_campus: Campus) -> Self {
        Self {
            origin,
            destination,
            origin_campus,
        }
    }
}

/// A composed itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct ShuttleItinerary {
    /// Always `[walk-to-stop, shuttle, walk-from-stop]`.
    pub segments: Vec<RouteSegment>,
    pub steps: Vec<Step>,
    pub distance_text: String,
    pub duration_text: String,
    pub next_departure: ScheduleEntry,
    /// Time spent waiting at the stop, never negative.
    pub wait_secs: i64,
    pub total_secs: i64,
}

/// Compose a walk → shuttle → walk itinerary departing at `now`.
///
/// Any failure discards every leg already fetched. Precondition failures
/// (missing stop data, no service on `now`'s date) return before the
/// provider is called.
pub async fn compose_itinerary<P: DirectionsProvider>(
    provider: &P,
    timetable: &Timetable,
    stops: &ShuttleStops,
    request: &ItineraryRequest,
    now: NaiveDateTime,
) -> Result<ShuttleItinerary, ItineraryError> {
    let (Some(from_stop), Some(to_stop)) = (
        stops.get(request.origin_campus),
        stops.get(request.origin_campus.other()),
    ) else {
        return Err(ItineraryError::MissingStopInfo);
    };

    if !timetable.is_operating(now.date()) {
        return Err(ItineraryError::NotOperating);
    }

    let walk_to = provider
        .get_directions(request.origin, from_stop.coords, TravelMode::Walking)
        .await?
        .ok_or(ItineraryError::LegUnavailable)?;

    let walk_to_secs = parse_duration_secs(&walk_to.duration_text);
    let arrival_at_stop = Duration::try_seconds(walk_to_secs)
        .and_then(|walk| now.checked_add_signed(walk))
        .ok_or(ItineraryError::LegUnavailable)?;
    let departure = timetable
        .next_departure(request.origin_campus, arrival_at_stop)
        .ok_or(ItineraryError::NoMoreDepartures)?;
    debug!(
        arrival = %arrival_at_stop,
        departure = %departure.label,
        "resolved shuttle departure"
    );

    let (ride, walk_from) = try_join(
        provider.get_directions(from_stop.coords, to_stop.coords, TravelMode::Driving),
        provider.get_directions(to_stop.coords, request.destination, TravelMode::Walking),
    )
    .await?;
    let ride = ride.ok_or(ItineraryError::LegUnavailable)?;
    let walk_from = walk_from.ok_or(ItineraryError::LegUnavailable)?;

    let ride_step = Step {
        instruction: format!(
            "Ride the shuttle from {} to {} ({})",
            from_stop.name,
            to_stop.name,
            departure.describe()
        ),
        distance: ride.distance_text.clone(),
        duration: ride.duration_text.clone(),
        leg: Some(LegTag::Shuttle),
        is_shuttle_step: true,
        is_last_bus: departure.is_last_bus,
    };
    let exit_step = Step {
        instruction: format!("Exit the shuttle at {}", to_stop.name),
        leg: Some(LegTag::Shuttle),
        is_shuttle_step: true,
        ..Step::default()
    };

    let mut steps = walking_steps(&walk_to, LegTag::WalkToStop);
    steps.push(ride_step);
    steps.push(exit_step);
    steps.extend(walking_steps(&walk_from, LegTag::WalkFromStop));

    let meters = parse_distance_meters(&walk_to.distance_text)
        + parse_distance_meters(&ride.distance_text)
        + parse_distance_meters(&walk_from.distance_text);
    let wait_secs = (departure.departure_time - arrival_at_stop)
        .num_seconds()
        .max(0);
    let total_secs = [
        wait_secs,
        parse_duration_secs(&ride.duration_text),
        parse_duration_secs(&walk_from.duration_text),
    ]
    .into_iter()
    .try_fold(walk_to_secs, i64::checked_add)
    .ok_or(ItineraryError::LegUnavailable)?;

    let itinerary = ShuttleItinerary {
        segments: vec![
            RouteSegment::new(WALK_TO_STOP_ID, walk_to.polyline, TravelMode::Walking),
            RouteSegment::new(SHUTTLE_ID, ride.polyline, TravelMode::Shuttle),
            RouteSegment::new(WALK_FROM_STOP_ID, walk_from.polyline, TravelMode::Walking),
        ],
        steps,
        distance_text: format_distance(meters),
        duration_text: format_duration(total_secs),
        next_departure: departure,
        wait_secs,
        total_secs,
    };
    info!(
        distance = %itinerary.distance_text,
        duration = %itinerary.duration_text,
        wait_secs,
        "shuttle itinerary composed"
    );
    Ok(itinerary)
}

/// A walking leg's steps, tagged, minus a trailing "destination" step.
///
/// The provider's final step announces arrival at the leg's endpoint, which
/// for the first leg is only the shuttle stop.
fn walking_steps(leg: &DirectionsResult, tag: LegTag) -> Vec<Step> {
    let mut steps = leg.steps.clone();
    if steps
        .last()
        .is_some_and(|s| s.instruction.to_lowercase().contains("destination"))
    {
        steps.pop();
    }
    steps.into_iter().map(|s| s.with_leg(tag)).collect()
}
