//! Directions API (`directions/json`) HTTP client.
//!
//! A simpler GET endpoint than `computeRoutes`. The provider reports most
//! failures inside a 200 response via its `status` field, so the status is
//! checked twice: once for HTTP, once in the payload.

use tracing::debug;

use crate::domain::{Coordinate, DirectionsResult, TravelMode};

use super::client::{DIRECTIONS_BASE_URL, DirectionsConfig, build_http, error_for_status};
use super::convert::convert_legacy_response;
use super::error::DirectionsError;
use super::provider::DirectionsProvider;
use super::types::LegacyDirectionsResponse;

fn legacy_travel_mode(mode: TravelMode) -> &'static str {
    match mode.provider_mode() {
        TravelMode::Walking => "walking",
        TravelMode::Transit => "transit",
        TravelMode::Driving | TravelMode::Shuttle => "driving",
    }
}

/// Directions API client.
#[derive(Debug, Clone)]
pub struct LegacyDirectionsClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    language: String,
}

impl LegacyDirectionsClient {
    /// Create a new Directions API client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        let http = build_http(&config)?;
        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config
                .base_url
                .unwrap_or_else(|| DIRECTIONS_BASE_URL.to_string()),
            language: config.language,
        })
    }

    /// Fetch directions between two points.
    pub async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<DirectionsResult, DirectionsError> {
        let api_key = self.api_key.as_deref().ok_or(DirectionsError::MissingApiKey)?;

        let url = format!("{}/maps/api/directions/json", self.base_url);
        debug!(%origin, %destination, %mode, "directions request");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("origin", origin.to_string()),
                ("destination", destination.to_string()),
                ("mode", legacy_travel_mode(mode).to_string()),
                ("language", self.language.clone()),
                ("key", api_key.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let body = response.text().await?;
        let parsed: LegacyDirectionsResponse =
            serde_json::from_str(&body).map_err(|e| DirectionsError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        convert_legacy_response(&parsed)
    }
}

impl DirectionsProvider for LegacyDirectionsClient {
    async fn get_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<DirectionsResult>, DirectionsError> {
        self.directions(origin, destination, mode).await.map(Some)
    }
}
