//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::controller::{
    ItineraryError, ItineraryRequest, NO_ROUTE_MESSAGE, compose_itinerary, error_message,
};
use crate::directions::{DirectionsError, DirectionsProvider};
use crate::domain::{Coordinate, TravelMode};
use crate::shuttle::{Campus, ScheduleKey};

use super::dto::*;
use super::state::AppState;

/// Departures returned when the request gives no count.
const DEFAULT_DEPARTURE_COUNT: usize = 3;

/// Upper bound on requested departures.
const MAX_DEPARTURE_COUNT: usize = 20;

/// Create the application router.
pub fn create_router<P: DirectionsProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/directions", get(directions::<P>))
        .route("/api/shuttle/departures", get(shuttle_departures::<P>))
        .route("/api/shuttle/status", get(shuttle_status::<P>))
        .route("/api/shuttle/itinerary", get(shuttle_itinerary::<P>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn parse_coordinate(field: &str, value: &str) -> Result<Coordinate, AppError> {
    Coordinate::parse_pair(value).ok_or_else(|| AppError::BadRequest {
        message: format!("Invalid {field} coordinate: {value} (expected lat,lng)"),
    })
}

fn parse_campus(value: &str) -> Result<Campus, AppError> {
    value.parse().map_err(|e| AppError::BadRequest {
        message: format!("{e}"),
    })
}

/// `YYYY-MM-DDTHH:MM`, or now when absent.
fn parse_instant(value: Option<&str>) -> Result<NaiveDateTime, AppError> {
    match value {
        Some(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").map_err(|_| {
            AppError::BadRequest {
                message: format!("Invalid time: {s} (expected YYYY-MM-DDTHH:MM)"),
            }
        }),
        None => Ok(Local::now().naive_local()),
    }
}

/// Point-to-point directions.
async fn directions<P: DirectionsProvider + 'static>(
    State(state): State<AppState<P>>,
    Query(req): Query<DirectionsQuery>,
) -> Result<Json<DirectionsResponse>, AppError> {
    let origin = parse_coordinate("origin", &req.origin)?;
    let destination = parse_coordinate("destination", &req.destination)?;
    let mode = match req.mode.as_deref() {
        Some(m) => m.parse::<TravelMode>().map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
        None => TravelMode::default(),
    };

    let result = state
        .provider
        .get_directions(origin, destination, mode)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound {
            message: NO_ROUTE_MESSAGE.to_string(),
        })?;

    Ok(Json(DirectionsResponse::from_result(mode, result)))
}

/// Upcoming departures from a campus.
async fn shuttle_departures<P: DirectionsProvider + 'static>(
    State(state): State<AppState<P>>,
    Query(req): Query<DeparturesQuery>,
) -> Result<Json<DeparturesResponse>, AppError> {
    let campus = parse_campus(&req.campus)?;
    let at = parse_instant(req.at.as_deref())?;
    let count = req
        .count
        .unwrap_or(DEFAULT_DEPARTURE_COUNT)
        .min(MAX_DEPARTURE_COUNT);

    let departures = state
        .timetable
        .next_departures(campus, count, at)
        .iter()
        .map(DepartureResult::from_entry)
        .collect();

    Ok(Json(DeparturesResponse { campus, departures }))
}

/// Whether the shuttle runs on a date, with its first and last departures
/// from downtown.
async fn shuttle_status<P: DirectionsProvider + 'static>(
    State(state): State<AppState<P>>,
    Query(req): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, AppError> {
    let date = match req.date.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
            message: format!("Invalid date: {s} (expected YYYY-MM-DD)"),
        })?,
        None => Local::now().date_naive(),
    };

    let departures = state.timetable.departures_for(Campus::Sgw, date);
    Ok(Json(StatusResponse {
        date,
        operating: state.timetable.is_operating(date),
        schedule: ScheduleKey::for_date(date).map(|k| k.as_str()),
        first_departure: departures.first().map(|d| d.label.clone()),
        last_departure: departures.last().map(|d| d.label.clone()),
    }))
}

/// One-shot walk → shuttle → walk itinerary.
async fn shuttle_itinerary<P: DirectionsProvider + 'static>(
    State(state): State<AppState<P>>,
    Query(req): Query<ItineraryQuery>,
) -> Result<Json<ItineraryResponse>, AppError> {
    let request = ItineraryRequest::new(
        parse_coordinate("origin", &req.origin)?,
        parse_coordinate("destination", &req.destination)?,
        parse_campus(&req.campus)?,
    );
    let now = parse_instant(req.at.as_deref())?;

    let itinerary = compose_itinerary(
        state.provider.as_ref(),
        &state.timetable,
        &state.stops,
        &request,
        now,
    )
    .await
    .map_err(AppError::from)?;

    Ok(Json(ItineraryResponse::from_itinerary(itinerary)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<DirectionsError> for AppError {
    fn from(e: DirectionsError) -> Self {
        let message = error_message(&e);
        match e {
            DirectionsError::NoRoute { .. } => AppError::NotFound { message },
            _ => AppError::Internal { message },
        }
    }
}

impl From<ItineraryError> for AppError {
    fn from(e: ItineraryError) -> Self {
        match e {
            ItineraryError::Directions(inner) => inner.into(),
            other @ ItineraryError::MissingStopInfo => AppError::Internal {
                message: other.user_message(),
            },
            other => AppError::NotFound {
                message: other.user_message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::MockDirectionsProvider;
    use crate::shuttle::{Timetable, concordia_stops};

    fn state() -> AppState<MockDirectionsProvider> {
        AppState::new(
            MockDirectionsProvider::new("data/mock_directions").unwrap(),
            Timetable::concordia(),
            concordia_stops(),
        )
    }

    fn directions_query(mode: Option<&str>) -> DirectionsQuery {
        DirectionsQuery {
            origin: "45.4958,-73.5772".into(),
            destination: "45.497163,-73.578535".into(),
            mode: mode.map(String::from),
        }
    }

    #[test]
    fn router_builds() {
        let _router = create_router(state());
    }

    #[test]
    fn parse_instant_format() {
        let at = parse_instant(Some("2026-02-23T09:00")).unwrap();
        assert_eq!(at.to_string(), "2026-02-23 09:00:00");
        assert!(matches!(
            parse_instant(Some("09:00")),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[test]
    fn bad_coordinate_is_bad_request() {
        assert!(matches!(
            parse_coordinate("origin", "north"),
            Err(AppError::BadRequest { .. })
        ));
        assert!(matches!(
            parse_coordinate("origin", "95.0,10.0"),
            Err(AppError::BadRequest { .. })
        ));
    }

    #[tokio::test]
    async fn directions_defaults_to_walking() {
        let Json(response) = directions(State(state()), Query(directions_query(None)))
            .await
            .unwrap();
        assert_eq!(response.mode, TravelMode::Walking);
        assert_eq!(response.distance_text, "0.2 km");
        assert!(!response.polyline.is_empty());
    }

    #[tokio::test]
    async fn directions_rejects_unknown_mode() {
        let result = directions(State(state()), Query(directions_query(Some("teleport")))).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn departures_from_campus() {
        let Json(response) = shuttle_departures(
            State(state()),
            Query(DeparturesQuery {
                campus: "sgw".into(),
                count: Some(2),
                at: Some("2026-02-23T09:00".into()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.campus, Campus::Sgw);
        let labels: Vec<_> = response.departures.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["09:15", "09:30"]);
    }

    #[tokio::test]
    async fn departures_reject_unknown_campus() {
        let result = shuttle_departures(
            State(state()),
            Query(DeparturesQuery {
                campus: "MTL".into(),
                count: None,
                at: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn status_on_weekday_and_weekend() {
        let Json(friday) = shuttle_status(
            State(state()),
            Query(StatusQuery {
                date: Some("2026-02-27".into()),
            }),
        )
        .await
        .unwrap();
        assert!(friday.operating);
        assert_eq!(friday.schedule, Some("FRIDAY"));
        assert_eq!(friday.first_departure.as_deref(), Some("09:45"));
        assert_eq!(friday.last_departure.as_deref(), Some("18:15"));

        let Json(saturday) = shuttle_status(
            State(state()),
            Query(StatusQuery {
                date: Some("2026-02-28".into()),
            }),
        )
        .await
        .unwrap();
        assert!(!saturday.operating);
        assert_eq!(saturday.schedule, None);
        assert_eq!(saturday.first_departure, None);
    }

    #[tokio::test]
    async fn itinerary_from_fixtures() {
        let Json(response) = shuttle_itinerary(
            State(state()),
            Query(ItineraryQuery {
                origin: "45.4958,-73.5772".into(),
                destination: "45.4582,-73.6405".into(),
                campus: "SGW".into(),
                at: Some("2026-02-23T09:00".into()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.segments.len(), 3);
        assert_eq!(response.segments[1].mode, TravelMode::Shuttle);
        // walk 3 min arrives 09:03, bus at 09:15
        assert_eq!(response.next_departure.label, "09:15");
        assert_eq!(response.wait_minutes, 12);
    }

    #[tokio::test]
    async fn itinerary_on_weekend_is_not_found() {
        let result = shuttle_itinerary(
            State(state()),
            Query(ItineraryQuery {
                origin: "45.4958,-73.5772".into(),
                destination: "45.4582,-73.6405".into(),
                campus: "SGW".into(),
                at: Some("2026-02-28T12:00".into()),
            }),
        )
        .await;

        match result {
            Err(AppError::NotFound { message }) => {
                assert_eq!(message, "Shuttle does not operate today.")
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn no_route_maps_to_not_found() {
        let err = AppError::from(DirectionsError::NoRoute {
            detail: "ZERO_RESULTS".into(),
        });
        match err {
            AppError::NotFound { message } => assert_eq!(message, "No route found."),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
