//! Directions provider request/response DTOs.
//!
//! Two wire shapes are supported: the Routes API (`computeRoutes`, camelCase
//! JSON, field-masked) and the older Directions API (`directions/json`,
//! snake_case JSON). Both use `Option` and `#[serde(default)]` liberally
//! because the providers omit fields rather than sending nulls.

use serde::{Deserialize, Serialize};

// --- Routes API -----------------------------------------------------------

/// Body of a `computeRoutes` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRoutesRequest {
    pub origin: Waypoint,
    pub destination: Waypoint,
    pub travel_mode: &'static str,
    pub language_code: String,
    pub units: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Waypoint {
    pub location: Location,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub lat_lng: LatLng,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Response from `computeRoutes`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComputeRoutesResponse {
    #[serde(default)]
    pub routes: Vec<RoutesRoute>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesRoute {
    /// Total route length in metres.
    pub distance_meters: Option<u64>,

    /// Total duration as seconds with an `s` suffix, e.g. `"754s"`.
    pub duration: Option<String>,

    pub polyline: Option<EncodedPolyline>,

    #[serde(default)]
    pub legs: Vec<RoutesLeg>,

    pub localized_values: Option<RouteLocalizedValues>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedPolyline {
    pub encoded_polyline: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLocalizedValues {
    pub distance: Option<LocalizedText>,
    pub duration: Option<LocalizedText>,
    pub static_duration: Option<LocalizedText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedText {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutesLeg {
    #[serde(default)]
    pub steps: Vec<RoutesStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesStep {
    pub distance_meters: Option<u64>,
    pub static_duration: Option<String>,
    pub navigation_instruction: Option<NavigationInstruction>,
    pub localized_values: Option<StepLocalizedValues>,
    pub transit_details: Option<RoutesTransitDetails>,
    pub travel_mode: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigationInstruction {
    pub maneuver: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepLocalizedValues {
    pub distance: Option<LocalizedText>,
    pub static_duration: Option<LocalizedText>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesTransitDetails {
    pub stop_details: Option<TransitStopDetails>,
    pub headsign: Option<String>,
    pub transit_line: Option<TransitLine>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitStopDetails {
    pub arrival_stop: Option<NamedStop>,
    pub departure_stop: Option<NamedStop>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedStop {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitLine {
    pub name: Option<String>,
    pub name_short: Option<String>,
    pub vehicle: Option<TransitVehicle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransitVehicle {
    pub name: Option<LocalizedText>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

// --- Directions API -------------------------------------------------------

/// Response from `directions/json`.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyDirectionsResponse {
    /// `"OK"`, `"ZERO_RESULTS"`, `"REQUEST_DENIED"`, ...
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<LegacyRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyRoute {
    pub overview_polyline: Option<PolylinePoints>,
    #[serde(default)]
    pub legs: Vec<LegacyLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolylinePoints {
    pub points: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyLeg {
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    #[serde(default)]
    pub steps: Vec<LegacyStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyStep {
    pub html_instructions: Option<String>,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    pub travel_mode: Option<String>,
    pub transit_details: Option<LegacyTransitDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyTransitDetails {
    pub departure_stop: Option<NamedStop>,
    pub arrival_stop: Option<NamedStop>,
    pub headsign: Option<String>,
    pub line: Option<LegacyLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyLine {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub vehicle: Option<LegacyVehicle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyVehicle {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
