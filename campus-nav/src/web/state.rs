//! Application state for the web layer.

use std::sync::Arc;

use crate::shuttle::{ShuttleStops, Timetable};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
pub struct AppState<P> {
    /// Directions provider (usually cached, with local fallback)
    pub provider: Arc<P>,

    /// Shuttle timetable
    pub timetable: Arc<Timetable>,

    /// Shuttle stops for both campuses
    pub stops: Arc<ShuttleStops>,
}

impl<P> AppState<P> {
    /// Create a new app state.
    pub fn new(provider: P, timetable: Timetable, stops: ShuttleStops) -> Self {
        Self {
            provider: Arc::new(provider),
            timetable: Arc::new(timetable),
            stops: Arc::new(stops),
        }
    }
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            timetable: Arc::clone(&self.timetable),
            stops: Arc::clone(&self.stops),
        }
    }
}
