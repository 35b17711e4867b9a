//! Local distance/duration estimates for when the provider is unavailable.

use tracing::warn;

use crate::domain::{
    Coordinate, DirectionsResult, Step, TravelMode, distance_meters, format_distance,
    format_duration,
};

use super::error::DirectionsError;
use super::provider::DirectionsProvider;

/// Nominal speed in metres per second.
fn nominal_speed(mode: TravelMode) -> f64 {
    match mode.provider_mode() {
        TravelMode::Walking => 1.4,
        TravelMode::Transit => 7.0,
        TravelMode::Driving | TravelMode::Shuttle => 11.0,
    }
}

/// A straight-line route with a haversine distance and a duration at the
/// mode's nominal speed.
pub fn estimate_directions(
    origin: Coordinate,
    destination: Coordinate,
    mode: TravelMode,
) -> DirectionsResult {
    let meters = distance_meters(origin, destination);
    let secs = (meters / nominal_speed(mode)).round() as i64;
    let distance_text = format_distance(meters);
    let duration_text = format_duration(secs);

    DirectionsResult {
        polyline: vec![origin, destination],
        steps: vec![Step::new(
            "Head toward your destination",
            distance_text.clone(),
            duration_text.clone(),
        )],
        distance_text,
        duration_text,
    }
}

/// Wraps a provider and substitutes [`estimate_directions`] when it fails
/// with a transient error.
#[derive(Debug, Clone)]
pub struct FallbackProvider<P> {
    inner: P,
}

impl<P> FallbackProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: DirectionsProvider> DirectionsProvider for FallbackProvider<P> {
    async fn get_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<DirectionsResult>, DirectionsError> {
        match self.inner.get_directions(origin, destination, mode).await {
            Err(e) if e.is_transient() => {
                warn!(error = %e, %mode, "directions provider failed; using local estimate");
                Ok(Some(estimate_directions(origin, destination, mode)))
            }
            other => other,
        }
    }
}
