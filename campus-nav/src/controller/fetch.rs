//! Debounced, deviation-aware directions fetching for one route.
//!
//! A [`DirectionsController`] owns the state for a single
//! origin/destination/mode triple. Input changes restart a debounce timer;
//! when it fires, a fresh request token is issued and the provider is called.
//! Responses carrying anything but the latest token are dropped, so a slow
//! earlier request can never overwrite a newer answer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::directions::DirectionsProvider;
use crate::domain::{Coordinate, TravelMode, min_distance_to_polyline, route_path};

use super::config::ControllerConfig;
use super::slot::{RequestSlot, RequestToken};
use super::state::{DirectionsState, FetchPhase, NO_ROUTE_MESSAGE, error_message};
use super::timed::Timed;

/// Segment id used for the single leg of a point-to-point route.
const ROUTE_SEGMENT_ID: &str = "route";

/// Caller-supplied inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteInputs {
    pub origin: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    pub mode: TravelMode,
}

/// The exact arguments of one provider call.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FetchRequest {
    origin: Coordinate,
    destination: Coordinate,
    mode: TravelMode,
}

struct Inner {
    inputs: RouteInputs,
    /// Arguments of the last successful fetch. Deviation recalculation
    /// reuses its destination and mode.
    last_fetch: Option<FetchRequest>,
    slot: RequestSlot,
}

struct Shared<P> {
    provider: Timed<P>,
    config: ControllerConfig,
    state: watch::Sender<DirectionsState>,
    inner: Mutex<Inner>,
}

impl<P> Shared<P> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn phase(&self) -> FetchPhase {
        self.state.borrow().phase
    }

    /// Issue a token and publish `Fetching`. Must be called with the lock held.
    fn begin_fetch(&self, inner: &mut Inner) -> RequestToken {
        let token = inner.slot.next_token();
        self.state
            .send_modify(|state| *state = state.pending(FetchPhase::Fetching));
        token
    }
}

impl<P: DirectionsProvider + 'static> Shared<P> {
    async fn fetch(&self, token: RequestToken, request: FetchRequest) {
        debug!(
            token,
            origin = %request.origin,
            destination = %request.destination,
            mode = %request.mode,
            "fetching directions"
        );

        let outcome = self
            .provider
            .get_directions(request.origin, request.destination, request.mode)
            .await;

        let mut inner = self.lock();
        if !inner.slot.is_current(token) {
            debug!(token, "discarding stale directions response");
            return;
        }

        let next = match outcome {
            Ok(Some(result)) => {
                info!(
                    token,
                    distance = %result.distance_text,
                    duration = %result.duration_text,
                    "directions fetched"
                );
                inner.last_fetch = Some(request);
                DirectionsState::success(result, ROUTE_SEGMENT_ID, request.mode)
            }
            Ok(None) => {
                info!(token, "provider returned no route");
                DirectionsState::failure(NO_ROUTE_MESSAGE)
            }
            Err(e) => {
                warn!(token, error = %e, "directions fetch failed");
                DirectionsState::failure(error_message(&e))
            }
        };
        self.state.send_replace(next);
    }
}

/// Controller for a standard point-to-point route.
///
/// Publishes a [`DirectionsState`] through a watch channel; callers either
/// poll [`state`](Self::state) or [`subscribe`](Self::subscribe). Must be
/// created inside a tokio runtime. Dropping the controller disposes it.
pub struct DirectionsController<P> {
    shared: Arc<Shared<P>>,
}

impl<P: DirectionsProvider + 'static> DirectionsController<P> {
    pub fn new(provider: Arc<P>, config: ControllerConfig) -> Self {
        let (state, _) = watch::channel(DirectionsState::default());
        let shared = Shared {
            provider: Timed::new(provider, config.request_timeout),
            config,
            state,
            inner: Mutex::new(Inner {
                inputs: RouteInputs::default(),
                last_fetch: None,
                slot: RequestSlot::new(),
            }),
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Replace all inputs at once.
    ///
    /// With both endpoints present this (re)starts the debounce timer; with
    /// either missing the controller returns to idle and clears its output.
    /// Supplying the inputs it already has is a no-op unless idle.
    pub fn set_inputs(
        &self,
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
        mode: TravelMode,
    ) {
        let mut inner = self.shared.lock();
        if inner.slot.is_disposed() {
            return;
        }

        let inputs = RouteInputs {
            origin,
            destination,
            mode,
        };
        if inner.inputs == inputs && self.shared.phase() != FetchPhase::Idle {
            trace!("inputs unchanged");
            return;
        }
        inner.inputs = inputs;
        inner.slot.invalidate();

        let (Some(origin), Some(destination)) = (origin, destination) else {
            debug!("origin or destination missing; directions idle");
            self.shared.state.send_replace(DirectionsState::default());
            return;
        };

        self.shared
            .state
            .send_modify(|state| *state = state.pending(FetchPhase::Debouncing));

        let request = FetchRequest {
            origin,
            destination,
            mode,
        };
        let shared = Arc::clone(&self.shared);
        let debounce = self.shared.config.debounce;
        let generation = inner.slot.current();
        trace!(?debounce, generation, "debounce scheduled");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let token = {
                let mut inner = shared.lock();
                if !inner.slot.is_current(generation) {
                    return;
                }
                inner.slot.release_pending();
                shared.begin_fetch(&mut inner)
            };
            shared.fetch(token, request).await;
        });
        inner.slot.set_pending(handle);
    }

    pub fn set_origin(&self, origin: Option<Coordinate>) {
        let inputs = self.inputs();
        self.set_inputs(origin, inputs.destination, inputs.mode);
    }

    pub fn set_destination(&self, destination: Option<Coordinate>) {
        let inputs = self.inputs();
        self.set_inputs(inputs.origin, destination, inputs.mode);
    }

    pub fn set_mode(&self, mode: TravelMode) {
        let inputs = self.inputs();
        self.set_inputs(inputs.origin, inputs.destination, mode);
    }

    /// Feed a live position.
    ///
    /// When the current route is settled and `position` is further than the
    /// deviation threshold from every point on it, a new fetch starts
    /// immediately from `position` to the last fetched destination. The
    /// caller's origin input is left unchanged.
    pub fn update_position(&self, position: Coordinate) {
        let mut inner = self.shared.lock();
        if inner.slot.is_disposed() {
            return;
        }

        let offset = {
            let state = self.shared.state.borrow();
            match state.phase {
                FetchPhase::Success => {}
                FetchPhase::Fetching => {
                    trace!("fetch in flight; skipping deviation check");
                    return;
                }
                _ => return,
            }
            let path = route_path(&state.route);
            if path.is_empty() {
                return;
            }
            min_distance_to_polyline(position, &path)
        };

        let Some(last) = inner.last_fetch else {
            return;
        };

        if offset <= self.shared.config.deviation_threshold_m {
            trace!(offset, "position on route");
            return;
        }

        info!(
            offset,
            threshold = self.shared.config.deviation_threshold_m,
            %position,
            "off route; recalculating"
        );
        inner.slot.cancel_pending();
        let token = self.shared.begin_fetch(&mut inner);
        let request = FetchRequest {
            origin: position,
            destination: last.destination,
            mode: last.mode,
        };
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            shared.fetch(token, request).await;
        });
    }
}

impl<P> DirectionsController<P> {
    pub fn subscribe(&self) -> watch::Receiver<DirectionsState> {
        self.shared.state.subscribe()
    }

    /// Current published state.
    pub fn state(&self) -> DirectionsState {
        self.shared.state.borrow().clone()
    }

    pub fn inputs(&self) -> RouteInputs {
        self.shared.lock().inputs
    }

    /// Cancel the pending timer and ignore every in-flight response.
    /// Later input changes are ignored.
    pub fn dispose(&self) {
        let mut inner = self.shared.lock();
        if !inner.slot.is_disposed() {
            debug!("directions controller disposed");
            inner.slot.dispose();
        }
    }
}

impl<P> Drop for DirectionsController<P> {
    fn drop(&mut self) {
        self.dispose();
    }
}
