//! Directions provider adapters.
//!
//! This module provides HTTP clients for the remote routing provider and
//! normalises their responses into [`DirectionsResult`](crate::domain::DirectionsResult).
//!
//! Key characteristics of the provider:
//! - Route geometry arrives as an encoded polyline (1e5 scale, zigzag deltas)
//! - Instructions contain HTML markup and `&nbsp;` entities
//! - Transit steps carry structured line/stop detail that makes a better
//!   instruction than the provider's own text
//! - Distance and duration come back as localized display strings

mod backend;
mod client;
mod convert;
mod error;
mod estimate;
mod legacy;
mod mock;
mod polyline;
mod provider;
mod types;

pub use backend::{DirectionsBackend, InvalidProviderKind, ProviderKind};
pub use client::{DIRECTIONS_BASE_URL, DirectionsConfig, ROUTES_BASE_URL, RoutesClient};
pub use convert::{
    TransitInfo, convert_legacy_response, convert_routes_response, strip_html,
    transit_instruction,
};
pub use error::DirectionsError;
pub use estimate::{FallbackProvider, estimate_directions};
pub use legacy::LegacyDirectionsClient;
pub use mock::MockDirectionsProvider;
pub use polyline::{PolylineError, decode_polyline, encode_polyline};
pub use provider::DirectionsProvider;
pub use types::{ComputeRoutesResponse, LegacyDirectionsResponse};
