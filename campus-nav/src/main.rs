use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use campus_nav::cache::{CacheConfig, CachedProvider};
use campus_nav::directions::{DirectionsBackend, DirectionsConfig, FallbackProvider, ProviderKind};
use campus_nav::shuttle::{Timetable, concordia_stops};
use campus_nav::web::{AppState, create_router};

/// Listen address when `CAMPUS_NAV_ADDR` is unset.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("campus_nav=info")),
        )
        .init();

    // Provider selection
    let api_key = env_var("CAMPUS_NAV_API_KEY");
    let mut kind: ProviderKind = match env_var("CAMPUS_NAV_PROVIDER") {
        Some(s) => s.parse()?,
        None => ProviderKind::default(),
    };
    if let ProviderKind::Mock(dir) = &mut kind
        && let Some(override_dir) = env_var("CAMPUS_NAV_MOCK_DIR")
    {
        *dir = PathBuf::from(override_dir);
    }
    if api_key.is_none() && !matches!(kind, ProviderKind::Mock(_)) {
        warn!("CAMPUS_NAV_API_KEY not set; directions requests will fail");
    }

    let backend = DirectionsBackend::new(&kind, DirectionsConfig::new(api_key))?;
    info!(provider = backend.name(), "directions provider ready");

    // Real answers are cached; estimates substituted on failure are not.
    let provider = FallbackProvider::new(CachedProvider::new(backend, &CacheConfig::default()));

    let state = AppState::new(provider, Timetable::concordia(), concordia_stops());
    let app = create_router(state);

    let addr: SocketAddr = env_var("CAMPUS_NAV_ADDR")
        .as_deref()
        .unwrap_or(DEFAULT_ADDR)
        .parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Campus navigation API listening on http://{addr}");
    info!("  GET /health");
    info!("  GET /api/directions?origin=lat,lng&destination=lat,lng&mode=walking");
    info!("  GET /api/shuttle/departures?campus=SGW&count=3");
    info!("  GET /api/shuttle/status?date=YYYY-MM-DD");
    info!("  GET /api/shuttle/itinerary?origin=lat,lng&destination=lat,lng&campus=SGW");

    axum::serve(listener, app).await?;
    Ok(())
}
