//! Published controller state.

use serde::Serialize;

use crate::directions::DirectionsError;
use crate::domain::{DirectionsResult, RouteSegment, Step, TravelMode};

/// Shown when the provider has no route between the two points.
pub const NO_ROUTE_MESSAGE: &str = "No route found.";

/// Shown when a failure carries no message of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to fetch directions.";

/// Where a controller is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    /// Origin or destination missing
    #[default]
    Idle,
    /// Inputs present, waiting for them to settle
    Debouncing,
    /// Provider call in flight
    Fetching,
    Success,
    Failure,
}

/// Snapshot published to subscribers after every transition.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DirectionsState {
    pub phase: FetchPhase,
    pub route: Vec<RouteSegment>,
    pub steps: Vec<Step>,
    pub distance_text: String,
    pub duration_text: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl DirectionsState {
    /// A successful single-leg route.
    pub fn success(result: DirectionsResult, segment_id: &str, mode: TravelMode) -> Self {
        Self {
            phase: FetchPhase::Success,
            route: vec![RouteSegment::new(segment_id, result.polyline, mode)],
            steps: result.steps,
            distance_text: result.distance_text,
            duration_text: result.duration_text,
            loading: false,
            error: None,
        }
    }

    /// A failure: everything cleared, one message set.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            phase: FetchPhase::Failure,
            error: Some(message),
            ..Self::default()
        }
    }

    /// Keep the current route on screen while a fetch or debounce is pending.
    pub(crate) fn pending(&self, phase: FetchPhase) -> Self {
        Self {
            phase,
            loading: phase == FetchPhase::Fetching,
            error: if phase == FetchPhase::Fetching {
                None
            } else {
                self.error.clone()
            },
            ..self.clone()
        }
    }

    pub fn has_route(&self) -> bool {
        !self.route.is_empty()
    }
}

/// User-facing text for a provider failure.
pub fn error_message(error: &DirectionsError) -> String {
    match error {
        DirectionsError::NoRoute { .. } => NO_ROUTE_MESSAGE.to_string(),
        other => {
            let text = other.to_string();
            if text.trim().is_empty() {
                FALLBACK_ERROR_MESSAGE.to_string()
            } else {
                text
            }
        }
    }
}
