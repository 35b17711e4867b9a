//! Timing and threshold configuration for the controllers.

use std::time::Duration;

/// Configuration shared by the directions and shuttle controllers.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Quiet period after the last input change before a fetch starts.
    pub debounce: Duration,

    /// Distance from the route (metres) beyond which a live position
    /// triggers a recalculation.
    pub deviation_threshold_m: f64,

    /// Upper bound on a single provider call.
    /// A call that exceeds this fails with a timeout error.
    pub request_timeout: Duration,
}

impl ControllerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(debounce: Duration, deviation_threshold_m: f64, request_timeout: Duration) -> Self {
        Self {
            debounce,
            deviation_threshold_m,
            request_timeout,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_deviation_threshold(mut self, meters: f64) -> Self {
        self.deviation_threshold_m = meters;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            deviation_threshold_m: 50.0,
            request_timeout: Duration::from_secs(20),
        }
    }
}
