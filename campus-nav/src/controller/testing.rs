//! Scripted provider shared by the controller test suites.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::directions::{DirectionsError, DirectionsProvider};
use crate::domain::{Coordinate, DirectionsResult, Step, TravelMode};

/// One recorded provider call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Call {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub mode: TravelMode,
}

/// What the provider answers.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A route along `[origin, destination]` with these texts.
    Route { distance: String, duration: String },
    Fixed(DirectionsResult),
    Empty,
    NoRoute,
    Fail(String),
}

impl Reply {
    pub fn route(distance: &str, duration: &str) -> Self {
        Reply::Route {
            distance: distance.to_string(),
            duration: duration.to_string(),
        }
    }

    fn resolve(&self, call: &Call) -> Result<Option<DirectionsResult>, DirectionsError> {
        match self {
            Reply::Route { distance, duration } => Ok(Some(DirectionsResult {
                polyline: vec![call.origin, call.destination],
                steps: vec![
                    Step::new(
                        format!("Head out by {}", call.mode),
                        distance.clone(),
                        duration.clone(),
                    ),
                    Step::new("Your destination will be on the left", "", ""),
                ],
                distance_text: distance.clone(),
                duration_text: duration.clone(),
            })),
            Reply::Fixed(result) => Ok(Some(result.clone())),
            Reply::Empty => Ok(None),
            Reply::NoRoute => Err(DirectionsError::NoRoute {
                detail: "ZERO_RESULTS".into(),
            }),
            Reply::Fail(message) => Err(DirectionsError::Transport(message.clone())),
        }
    }
}

type Script = Box<dyn Fn(&Call) -> Reply + Send + Sync>;

/// Records every call and answers from a script, optionally after a delay.
///
/// Delays are consumed one per call in order; calls beyond the queued
/// delays answer immediately.
pub struct ScriptedProvider {
    script: Script,
    delays: Mutex<VecDeque<Duration>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedProvider {
    pub fn new(script: impl Fn(&Call) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            delays: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `reply`.
    pub fn always(reply: Reply) -> Self {
        Self::new(move |_| reply.clone())
    }

    pub fn with_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        self.delays.lock().unwrap().extend(delays);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl DirectionsProvider for ScriptedProvider {
    async fn get_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Option<DirectionsResult>, DirectionsError> {
        let call = Call {
            origin,
            destination,
            mode,
        };
        self.calls.lock().unwrap().push(call);
        let reply = (self.script)(&call);
        let delay = self.delays.lock().unwrap().pop_front();

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        reply.resolve(&call)
    }
}

/// Let paused time run forward by `ms` milliseconds.
pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
