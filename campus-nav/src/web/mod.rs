//! Web layer for campus navigation.
//!
//! Exposes one-shot directions, shuttle departures and status, and shuttle
//! itineraries as a JSON API.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
