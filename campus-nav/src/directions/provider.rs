//! The provider abstraction consumed by the controllers.

use std::future::Future;
use std::sync::Arc;

use crate::domain::{Coordinate, DirectionsResult, TravelMode};

use super::error::DirectionsError;

/// Something that can answer "how do I get from A to B by this mode?".
///
/// `Ok(None)` and `Err(DirectionsError::NoRoute { .. })` both mean the
/// provider had no route; controllers treat them identically.
///
/// This abstraction allows controllers and the itinerary composer to be
/// tested with scripted providers.
pub trait DirectionsProvider: Send + Sync {
    fn get_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> impl Future<Output = Result<Option<DirectionsResult>, DirectionsError>> + Send;
}

impl<P: DirectionsProvider> DirectionsProvider for Arc<P> {
    fn get_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> impl Future<Output = Result<Option<DirectionsResult>, DirectionsError>> + Send {
        (**self).get_directions(origin, destination, mode)
    }
}
