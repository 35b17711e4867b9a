//! Directions and shuttle controllers.
//!
//! Each controller owns the state for one route on screen. Callers push
//! inputs (origin, destination, mode or campus, live position) and read the
//! result from a watch channel. Inputs are debounced; every fetch carries a
//! request token and only the latest token may publish.
//!
//! Errors never escape a controller: they become the `error` field of the
//! published state.

mod config;
mod fetch;
mod itinerary;
mod shuttle;
mod slot;
mod state;
mod timed;

#[cfg(test)]
mod testing;

pub use config::ControllerConfig;
pub use fetch::{DirectionsController, RouteInputs};
pub use itinerary::{
    ItineraryError, ItineraryRequest, SHUTTLE_ID, ShuttleItinerary, WALK_FROM_STOP_ID,
    WALK_TO_STOP_ID, compose_itinerary,
};
pub use shuttle::{ShuttleController, ShuttleInputs, ShuttleState};
pub use slot::{RequestSlot, RequestToken};
pub use state::{
    DirectionsState, FALLBACK_ERROR_MESSAGE, FetchPhase, NO_ROUTE_MESSAGE, error_message,
};
pub use timed::Timed;
