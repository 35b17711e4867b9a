//! Debounced shuttle itinerary computation.
//!
//! Same timer and token discipline as [`DirectionsController`](super::DirectionsController),
//! but each fetch composes a full walk → shuttle → walk itinerary and nothing
//! happens on live position updates.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::directions::DirectionsProvider;
use crate::domain::Coordinate;
use crate::shuttle::{Campus, ScheduleEntry, ShuttleStops, Timetable};

use super::config::ControllerConfig;
use super::itinerary::{ItineraryRequest, compose_itinerary};
use super::slot::{RequestSlot, RequestToken};
use super::state::{DirectionsState, FetchPhase};
use super::timed::Timed;

type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Caller-supplied inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShuttleInputs {
    /// Shuttle mode selected by the caller.
    pub enabled: bool,
    pub origin: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    pub origin_campus: Option<Campus>,
}

impl ShuttleInputs {
    fn request(&self) -> Option<ItineraryRequest> {
        if !self.enabled {
            return None;
        }
        Some(ItineraryRequest::new(
            self.origin?,
            self.destination?,
            self.origin_campus?,
        ))
    }
}

/// Published shuttle state: a three-segment route plus the bus it relies on.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ShuttleState {
    #[serde(flatten)]
    pub directions: DirectionsState,
    pub next_departure: Option<ScheduleEntry>,
}

impl ShuttleState {
    fn pending(&self, phase: FetchPhase) -> Self {
        Self {
            directions: self.directions.pending(phase),
            next_departure: self.next_departure.clone(),
        }
    }
}

struct Inner {
    inputs: ShuttleInputs,
    slot: RequestSlot,
}

struct Shared<P> {
    provider: Timed<P>,
    timetable: Arc<Timetable>,
    stops: Arc<ShuttleStops>,
    clock: Clock,
    config: ControllerConfig,
    state: watch::Sender<ShuttleState>,
    inner: Mutex<Inner>,
}

impl<P> Shared<P> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: DirectionsProvider + 'static> Shared<P> {
    async fn compose(&self, token: RequestToken, request: ItineraryRequest) {
        let now = (self.clock)();
        debug!(token, campus = %request.origin_campus, %now, "composing shuttle itinerary");

        let outcome = compose_itinerary(
            &self.provider,
            &self.timetable,
            &self.stops,
            &request,
            now,
        )
        .await;

        let inner = self.lock();
        if !inner.slot.is_current(token) {
            debug!(token, "discarding stale shuttle itinerary");
            return;
        }

        let next = match outcome {
            Ok(itinerary) => ShuttleState {
                directions: DirectionsState {
                    phase: FetchPhase::Success,
                    route: itinerary.segments,
                    steps: itinerary.steps,
                    distance_text: itinerary.distance_text,
                    duration_text: itinerary.duration_text,
                    loading: false,
                    error: None,
                },
                next_departure: Some(itinerary.next_departure),
            },
            Err(e) => {
                warn!(token, error = %e, "shuttle itinerary failed");
                ShuttleState {
                    directions: DirectionsState::failure(e.user_message()),
                    next_departure: None,
                }
            }
        };
        self.state.send_replace(next);
    }
}

/// Controller for inter-campus shuttle itineraries.
///
/// Inactive unless `enabled` is set and origin, destination and origin
/// campus are all known. Dropping the controller disposes it.
pub struct ShuttleController<P> {
    shared: Arc<Shared<P>>,
}

impl<P: DirectionsProvider + 'static> ShuttleController<P> {
    /// A controller that reads the local wall clock.
    pub fn new(
        provider: Arc<P>,
        timetable: Arc<Timetable>,
        stops: Arc<ShuttleStops>,
        config: ControllerConfig,
    ) -> Self {
        Self::with_clock(provider, timetable, stops, config, local_now)
    }

    /// A controller whose notion of "now" comes from `clock`.
    pub fn with_clock(
        provider: Arc<P>,
        timetable: Arc<Timetable>,
        stops: Arc<ShuttleStops>,
        config: ControllerConfig,
        clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static,
    ) -> Self {
        let (state, _) = watch::channel(ShuttleState::default());
        let shared = Shared {
            provider: Timed::new(provider, config.request_timeout),
            timetable,
            stops,
            clock: Arc::new(clock),
            config,
            state,
            inner: Mutex::new(Inner {
                inputs: ShuttleInputs::default(),
                slot: RequestSlot::new(),
            }),
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Replace all inputs at once.
    pub fn set_inputs(&self, inputs: ShuttleInputs) {
        let mut inner = self.shared.lock();
        if inner.slot.is_disposed() {
            return;
        }

        let idle = self.shared.state.borrow().directions.phase == FetchPhase::Idle;
        if inner.inputs == inputs && !idle {
            trace!("shuttle inputs unchanged");
            return;
        }
        inner.inputs = inputs;
        inner.slot.invalidate();

        let Some(request) = inputs.request() else {
            debug!(enabled = inputs.enabled, "shuttle inactive");
            self.shared.state.send_replace(ShuttleState::default());
            return;
        };

        self.shared
            .state
            .send_modify(|state| *state = state.pending(FetchPhase::Debouncing));

        let shared = Arc::clone(&self.shared);
        let debounce = self.shared.config.debounce;
        let generation = inner.slot.current();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let token = {
                let mut inner = shared.lock();
                if !inner.slot.is_current(generation) {
                    return;
                }
                inner.slot.release_pending();
                let token = inner.slot.next_token();
                shared
                    .state
                    .send_modify(|state| *state = state.pending(FetchPhase::Fetching));
                token
            };
            shared.compose(token, request).await;
        });
        inner.slot.set_pending(handle);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.set_inputs(ShuttleInputs {
            enabled,
            ..self.inputs()
        });
    }

    pub fn set_origin(&self, origin: Option<Coordinate>) {
        self.set_inputs(ShuttleInputs {
            origin,
            ..self.inputs()
        });
    }

    pub fn set_destination(&self, destination: Option<Coordinate>) {
        self.set_inputs(ShuttleInputs {
            destination,
            ..self.inputs()
        });
    }

    pub fn set_origin_campus(&self, origin_campus: Option<Campus>) {
        self.set_inputs(ShuttleInputs {
            origin_campus,
            ..self.inputs()
        });
    }
}

impl<P> ShuttleController<P> {
    pub fn subscribe(&self) -> watch::Receiver<ShuttleState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> ShuttleState {
        self.shared.state.borrow().clone()
    }

    pub fn inputs(&self) -> ShuttleInputs {
        self.shared.lock().inputs
    }

    /// Accepted for parity with the directions controller; shuttle
    /// itineraries are not recalculated on deviation.
    pub fn update_position(&self, position: Coordinate) {
        trace!(%position, "shuttle position update ignored");
    }

    pub fn dispose(&self) {
        let mut inner = self.shared.lock();
        if !inner.slot.is_disposed() {
            debug!("shuttle controller disposed");
            inner.slot.dispose();
        }
    }
}

impl<P> Drop for ShuttleController<P> {
    fn drop(&mut self) {
        self.dispose();
    }
}
