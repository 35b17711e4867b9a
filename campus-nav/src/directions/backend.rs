//! Runtime selection between the concrete providers.

use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::{Coordinate, DirectionsResult, TravelMode};

use super::client::{DirectionsConfig, RoutesClient};
use super::error::DirectionsError;
use super::legacy::LegacyDirectionsClient;
use super::mock::MockDirectionsProvider;
use super::provider::DirectionsProvider;

/// Which provider backend to use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Routes API `computeRoutes`
    #[default]
    Routes,
    /// Directions API `directions/json`
    Directions,
    /// JSON fixtures from a directory
    Mock(PathBuf),
}

/// Error returned when parsing an unknown provider name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown directions provider: {0} (expected routes, directions or mock)")]
pub struct InvalidProviderKind(String);

impl FromStr for ProviderKind {
    type Err = InvalidProviderKind;

    /// Parses `routes`, `directions`, or `mock` (fixtures from
    /// `data/mock_directions`) / `mock:<dir>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "routes" => return Ok(ProviderKind::Routes),
            "directions" | "legacy" => return Ok(ProviderKind::Directions),
            "mock" => return Ok(ProviderKind::Mock(PathBuf::from("data/mock_directions"))),
            _ => {}
        }
        match s.split_once(':') {
            Some((kind, dir)) if kind.eq_ignore_ascii_case("mock") && !dir.is_empty() => {
                Ok(ProviderKind::Mock(PathBuf::from(dir)))
            }
            _ => Err(InvalidProviderKind(s.to_string())),
        }
    }
}

/// One of the concrete providers, chosen at runtime.
#[derive(Debug, Clone)]
pub enum DirectionsBackend {
    Routes(RoutesClient),
    Directions(LegacyDirectionsClient),
    Mock(MockDirectionsProvider),
}

impl DirectionsBackend {
    /// Build the backend for `kind`.
    pub fn new(kind: &ProviderKind, config: DirectionsConfig) -> Result<Self, DirectionsError> {
        Ok(match kind {
            ProviderKind::Routes => DirectionsBackend::Routes(RoutesClient::new(config)?),
            ProviderKind::Directions => {
                DirectionsBackend::Directions(LegacyDirectionsClient::new(config)?)
            }
            ProviderKind::Mock(dir) => DirectionsBackend::Mock(MockDirectionsProvider::new(dir)?),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            DirectionsBackend::Routes(_) => "routes",
            DirectionsBackend::Directions(_) => "directions",
            DirectionsBackend::Mock(_) => "mock",
        }
    }
}

impl DirectionsProvider for DirectionsBackend {
    async fn get_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<DirectionsResult>, DirectionsError> {
        match self {
            DirectionsBackend::Routes(c) => c.get_directions(origin, destination, mode).await,
            DirectionsBackend::Directions(c) => c.get_directions(origin, destination, mode).await,
            DirectionsBackend::Mock(c) => c.get_directions(origin, destination, mode).await,
        }
    }
}
