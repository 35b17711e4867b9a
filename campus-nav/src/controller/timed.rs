//! Bounds every provider call made on behalf of a controller.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::directions::{DirectionsError, DirectionsProvider};
use crate::domain::{Coordinate, DirectionsResult, TravelMode};

/// Provider wrapper that fails with [`DirectionsError::Timeout`] when the
/// inner call takes longer than `limit`.
pub struct Timed<P> {
    inner: Arc<P>,
    limit: Duration,
}

impl<P> Timed<P> {
    pub fn new(inner: Arc<P>, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

impl<P> Clone for Timed<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limit: self.limit,
        }
    }
}

impl<P: DirectionsProvider> DirectionsProvider for Timed<P> {
    async fn get_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<DirectionsResult>, DirectionsError> {
        match tokio::time::timeout(
            self.limit,
            self.inner.get_directions(origin, destination, mode),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    %origin,
                    %destination,
                    %mode,
                    limit = ?self.limit,
                    "directions request timed out"
                );
                Err(DirectionsError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slow(Duration);

    impl DirectionsProvider for Slow {
        async fn get_directions(
            &self,
            origin: Coordinate,
            destination: Coordinate,
            _mode: TravelMode,
        ) -> Result<Option<DirectionsResult>, DirectionsError> {
            tokio::time::sleep(self.0).await;
            Ok(Some(DirectionsResult {
                polyline: vec![origin, destination],
                ..DirectionsResult::default()
            }))
        }
    }

    const A: Coordinate = Coordinate::new(45.0, -73.0);
    const B: Coordinate = Coordinate::new(45.1, -73.1);

    #[tokio::test(start_paused = true)]
    async fn fast_call_passes_through() {
        let timed = Timed::new(Arc::new(Slow(Duration::from_secs(1))), Duration::from_secs(5));
        let result = timed.get_directions(A, B, TravelMode::Walking).await.unwrap();
        assert!(result.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_call_times_out() {
        let timed = Timed::new(Arc::new(Slow(Duration::from_secs(60))), Duration::from_secs(5));
        let result = timed.get_directions(A, B, TravelMode::Walking).await;
        assert!(matches!(result, Err(DirectionsError::Timeout)));
    }
}
