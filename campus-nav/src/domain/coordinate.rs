//! Geographic coordinates and great-circle geometry.
//!
//! Deviation detection only ever needs "how far is this point from that
//! route", so this module stays small: a haversine distance and a
//! nearest-vertex polyline distance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a `"lat,lng"` pair as used in query strings.
    ///
    /// ```
    /// use campus_nav::domain::Coordinate;
    ///
    /// let c = Coordinate::parse_pair("45.4973,-73.5790").unwrap();
    /// assert_eq!(c, Coordinate::new(45.4973, -73.5790));
    /// assert!(Coordinate::parse_pair("45.4973").is_none());
    /// assert!(Coordinate::parse_pair("91.0,0.0").is_none());
    /// ```
    pub fn parse_pair(s: &str) -> Option<Self> {
        let (lat, lng) = s.split_once(',')?;
        let latitude: f64 = lat.trim().parse().ok()?;
        let longitude: f64 = lng.trim().parse().ok()?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self::new(latitude, longitude))
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_meters(*self, *other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Convert degrees to radians.
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Haversine distance between two points, in metres.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = to_radians(a.latitude);
    let lat2 = to_radians(b.latitude);
    let d_lat = to_radians(b.latitude - a.latitude);
    let d_lon = to_radians(b.longitude - a.longitude);

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let c = 2.0 * h.min(1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Smallest distance from `point` to any vertex of `polyline`, in metres.
///
/// Returns `f64::INFINITY` for an empty polyline, which never exceeds a
/// deviation threshold in a meaningful way: callers treat it as "nothing to
/// compare against".
pub fn min_distance_to_polyline(point: Coordinate, polyline: &[Coordinate]) -> f64 {
    polyline
        .iter()
        .map(|p| distance_meters(point, *p))
        .fold(f64::INFINITY, f64::min)
}
