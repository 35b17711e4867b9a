//! Campuses and their shuttle stops.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Coordinate;

/// One of the two campuses served by the inter-campus shuttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Campus {
    /// Sir George Williams (downtown).
    #[serde(rename = "SGW")]
    Sgw,
    /// Loyola (west end).
    #[serde(rename = "LOY")]
    Loy,
}

impl Campus {
    pub fn id(&self) -> &'static str {
        match self {
            Campus::Sgw => "SGW",
            Campus::Loy => "LOY",
        }
    }

    /// The campus at the other end of the shuttle line.
    pub fn other(&self) -> Campus {
        match self {
            Campus::Sgw => Campus::Loy,
            Campus::Loy => Campus::Sgw,
        }
    }
}

impl fmt::Display for Campus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown campus id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown campus: {0}")]
pub struct InvalidCampus(String);

impl FromStr for Campus {
    type Err = InvalidCampus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SGW" => Ok(Campus::Sgw),
            "LOY" => Ok(Campus::Loy),
            _ => Err(InvalidCampus(s.to_string())),
        }
    }
}

/// Where the shuttle picks up and drops off on a campus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuttleStop {
    pub id: String,
    pub campus: Campus,
    pub name: String,
    pub coords: Coordinate,
}

/// Shuttle stops keyed by campus.
#[derive(Debug, Clone, Default)]
pub struct ShuttleStops {
    stops: HashMap<Campus, ShuttleStop>,
}

impl ShuttleStops {
    /// Create an empty set of stops.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the stop for `stop.campus`.
    pub fn with_stop(mut self, stop: ShuttleStop) -> Self {
        self.stops.insert(stop.campus, stop);
        self
    }

    pub fn get(&self, campus: Campus) -> Option<&ShuttleStop> {
        self.stops.get(&campus)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// The two Concordia shuttle stops.
pub fn concordia_stops() -> ShuttleStops {
    ShuttleStops::new()
        .with_stop(ShuttleStop {
            id: "sgw-hall".to_string(),
            campus: Campus::Sgw,
            name: "SGW Campus (Hall Building)".to_string(),
            coords: Coordinate::new(45.497163, -73.578535),
        })
        .with_stop(ShuttleStop {
            id: "loy-chapel".to_string(),
            campus: Campus::Loy,
            name: "Loyola Campus (Chapel)".to_string(),
            coords: Coordinate::new(45.458424, -73.638369),
        })
}
