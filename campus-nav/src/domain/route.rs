//! Route legs, turn-by-turn steps and normalised provider results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// How a leg of a journey is travelled.
///
/// `Shuttle` never goes to a directions provider as-is: the shuttle leg is
/// requested as a driving route and re-tagged afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Driving,
    Transit,
    Shuttle,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Driving => "driving",
            TravelMode::Transit => "transit",
            TravelMode::Shuttle => "shuttle",
        }
    }

    /// The mode actually sent to a road-network provider.
    pub fn provider_mode(&self) -> TravelMode {
        match self {
            TravelMode::Shuttle => TravelMode::Driving,
            other => *other,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown travel mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode: {0}")]
pub struct InvalidTravelMode(String);

impl FromStr for TravelMode {
    type Err = InvalidTravelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" | "walk" => Ok(TravelMode::Walking),
            "driving" | "drive" => Ok(TravelMode::Driving),
            "transit" => Ok(TravelMode::Transit),
            "shuttle" => Ok(TravelMode::Shuttle),
            _ => Err(InvalidTravelMode(s.to_string())),
        }
    }
}

/// One continuous, single-mode portion of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub id: String,
    pub coordinates: Vec<Coordinate>,
    pub mode: TravelMode,
}

impl RouteSegment {
    pub fn new(id: impl Into<String>, coordinates: Vec<Coordinate>, mode: TravelMode) -> Self {
        Self {
            id: id.into(),
            coordinates,
            mode,
        }
    }
}

/// Concatenate every segment's path in travel order.
pub fn route_path(segments: &[RouteSegment]) -> Vec<Coordinate> {
    segments
        .iter()
        .flat_map(|s| s.coordinates.iter().copied())
        .collect()
}

/// Which leg of a shuttle itinerary a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegTag {
    WalkToStop,
    Shuttle,
    WalkFromStop,
}

/// A single turn-by-turn instruction.
///
/// Distance and duration are display text exactly as the provider (or the
/// itinerary composer) formatted them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Step {
    pub instruction: String,
    pub distance: String,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leg: Option<LegTag>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_shuttle_step: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_last_bus: bool,
}

impl Step {
    pub fn new(
        instruction: impl Into<String>,
        distance: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            distance: distance.into(),
            duration: duration.into(),
            ..Self::default()
        }
    }

    /// Tag this step with the itinerary leg it belongs to.
    pub fn with_leg(mut self, leg: LegTag) -> Self {
        self.leg = Some(leg);
        self
    }
}

/// A provider response, normalised.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionsResult {
    pub polyline: Vec<Coordinate>,
    pub steps: Vec<Step>,
    pub distance_text: String,
    pub duration_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_mode_parse_and_display() {
        for mode in [
            TravelMode::Walking,
            TravelMode::Driving,
            TravelMode::Transit,
            TravelMode::Shuttle,
        ] {
            assert_eq!(mode.to_string().parse::<TravelMode>(), Ok(mode));
        }
        assert_eq!("WALK".parse::<TravelMode>(), Ok(TravelMode::Walking));
        assert!("bicycling".parse::<TravelMode>().is_err());
    }

    #[test]
    fn shuttle_is_requested_as_driving() {
        assert_eq!(TravelMode::Shuttle.provider_mode(), TravelMode::Driving);
        assert_eq!(TravelMode::Transit.provider_mode(), TravelMode::Transit);
    }

    #[test]
    fn route_path_keeps_segment_order() {
        let a = Coordinate::new(1.0, 1.0);
        let b = Coordinate::new(2.0, 2.0);
        let c = Coordinate::new(3.0, 3.0);
        let segments = vec![
            RouteSegment::new("one", vec![a, b], TravelMode::Walking),
            RouteSegment::new("two", vec![c], TravelMode::Shuttle),
        ];
        assert_eq!(route_path(&segments), vec![a, b, c]);
        assert!(route_path(&[]).is_empty());
    }

    #[test]
    fn step_serialization_omits_unset_flags() {
        let step = Step::new("Turn left", "50 m", "1 min");
        let json = serde_json::to_value(&step).unwrap();
        assert!(json.get("is_shuttle_step").is_none());
        assert!(json.get("leg").is_none());

        let tagged = Step::new("Ride", "6 km", "30 min").with_leg(LegTag::Shuttle);
        let json = serde_json::to_value(&tagged).unwrap();
        assert_eq!(json["leg"], "shuttle");
    }
}
