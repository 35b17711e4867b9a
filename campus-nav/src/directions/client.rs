//! Routes API (`computeRoutes`) HTTP client.
//!
//! Requests carry the API key and a field mask as headers; the field mask
//! limits the response to the geometry, steps and localized summary text
//! that [`DirectionsResult`] needs.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::domain::{Coordinate, DirectionsResult, TravelMode};

use super::convert::convert_routes_response;
use super::error::DirectionsError;
use super::provider::DirectionsProvider;
use super::types::{
    ComputeRoutesRequest, ComputeRoutesResponse, ErrorEnvelope, LatLng, Location, Waypoint,
};

/// Default base URL for the Routes API.
pub const ROUTES_BASE_URL: &str = "https://routes.googleapis.com";

/// Default base URL for the Directions API.
pub const DIRECTIONS_BASE_URL: &str = "https://maps.googleapis.com";

/// Response fields requested from `computeRoutes`.
const FIELD_MASK: &str = "routes.distanceMeters,routes.duration,routes.polyline.encodedPolyline,\
routes.localizedValues,routes.legs.steps.distanceMeters,routes.legs.steps.staticDuration,\
routes.legs.steps.navigationInstruction,routes.legs.steps.localizedValues,\
routes.legs.steps.travelMode,routes.legs.steps.transitDetails";

/// Configuration shared by the HTTP directions clients.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// API key; `None` or blank makes every request fail fast
    pub api_key: Option<String>,
    /// Override for the provider base URL (for testing)
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Language for instructions and localized text
    pub language: String,
}

impl DirectionsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: None,
            timeout_secs: 15,
            language: "en".to_string(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the instruction language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

pub(crate) fn build_http(config: &DirectionsConfig) -> Result<reqwest::Client, DirectionsError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Turn a non-2xx response into an error, preferring the provider's own
/// error message over the raw body.
pub(crate) async fn error_for_status(response: reqwest::Response) -> DirectionsError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .and_then(|e| {
            let status = e.error.status.unwrap_or_default();
            e.error.message.map(|m| {
                if status.is_empty() {
                    m
                } else {
                    format!("{status}: {m}")
                }
            })
        })
        .unwrap_or(body);

    DirectionsError::Api { status, message }
}

fn routes_travel_mode(mode: TravelMode) -> &'static str {
    match mode.provider_mode() {
        TravelMode::Walking => "WALK",
        TravelMode::Transit => "TRANSIT",
        TravelMode::Driving | TravelMode::Shuttle => "DRIVE",
    }
}

fn waypoint(c: Coordinate) -> Waypoint {
    Waypoint {
        location: Location {
            lat_lng: LatLng {
                latitude: c.latitude,
                longitude: c.longitude,
            },
        },
    }
}

/// Routes API client.
#[derive(Debug, Clone)]
pub struct RoutesClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    language: String,
}

impl RoutesClient {
    /// Create a new Routes API client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        let http = build_http(&config)?;
        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config
                .base_url
                .unwrap_or_else(|| ROUTES_BASE_URL.to_string()),
            language: config.language,
        })
    }

    /// Compute a single route.
    pub async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<DirectionsResult, DirectionsError> {
        let api_key = self.api_key.as_deref().ok_or(DirectionsError::MissingApiKey)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).map_err(|_| DirectionsError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?,
        );
        headers.insert("x-goog-fieldmask", HeaderValue::from_static(FIELD_MASK));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = ComputeRoutesRequest {
            origin: waypoint(origin),
            destination: waypoint(destination),
            travel_mode: routes_travel_mode(mode),
            language_code: self.language.clone(),
            units: "METRIC",
        };

        let url = format!("{}/directions/v2:computeRoutes", self.base_url);
        debug!(%origin, %destination, %mode, "computeRoutes request");

        let response = self
            .http
            .post(&url)
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let body = response.text().await?;
        let parsed: ComputeRoutesResponse =
            serde_json::from_str(&body).map_err(|e| DirectionsError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        convert_routes_response(&parsed)
    }
}

impl DirectionsProvider for RoutesClient {
    async fn get_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<DirectionsResult>, DirectionsError> {
        self.compute_route(origin, destination, mode).await.map(Some)
    }
}
