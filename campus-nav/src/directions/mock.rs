//! Mock directions provider for running without API access.
//!
//! Loads Directions API responses from JSON files and serves them as if they
//! were live answers. The same fixture is returned for every origin and
//! destination; only the travel mode selects which file is used.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{Coordinate, DirectionsResult, TravelMode};

use super::convert::convert_legacy_response;
use super::error::DirectionsError;
use super::provider::DirectionsProvider;
use super::types::LegacyDirectionsResponse;

/// Mock provider that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockDirectionsProvider {
    /// Pre-converted results, keyed by provider travel mode.
    results: Arc<HashMap<TravelMode, DirectionsResult>>,
}

impl MockDirectionsProvider {
    /// Create a new mock provider by loading JSON files from a directory.
    ///
    /// Expects files named `{mode}.json` (`walking.json`, `driving.json`,
    /// `transit.json`); at least one must be present.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, DirectionsError> {
        let data_dir = data_dir.as_ref();
        let mut results = HashMap::new();

        for mode in [TravelMode::Walking, TravelMode::Driving, TravelMode::Transit] {
            let path = data_dir.join(format!("{}.json", mode.as_str()));
            if !path.is_file() {
                continue;
            }

            let json = std::fs::read_to_string(&path).map_err(|e| DirectionsError::Api {
                status: 0,
                message: format!("Failed to read {:?}: {}", path, e),
            })?;

            let response: LegacyDirectionsResponse =
                serde_json::from_str(&json).map_err(|e| DirectionsError::Json {
                    message: format!("Failed to parse {:?}: {}", path, e),
                    body: None,
                })?;

            results.insert(mode, convert_legacy_response(&response)?);
        }

        if results.is_empty() {
            return Err(DirectionsError::Api {
                status: 0,
                message: format!("No mock directions files found in {:?}", data_dir),
            });
        }

        Ok(Self {
            results: Arc::new(results),
        })
    }

    /// Travel modes with a loaded fixture.
    pub fn available_modes(&self) -> Vec<TravelMode> {
        self.results.keys().copied().collect()
    }
}

impl DirectionsProvider for MockDirectionsProvider {
    async fn get_directions(
        &self,
        _origin: Coordinate,
        _destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<DirectionsResult>, DirectionsError> {
        Ok(self.results.get(&mode.provider_mode()).cloned())
    }
}
