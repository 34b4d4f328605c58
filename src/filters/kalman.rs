use super::AxisFilter;
use crate::constants::{
    DEFAULT_KALMAN_ERROR_ESTIMATE, DEFAULT_KALMAN_ERROR_MEASURE, DEFAULT_KALMAN_PROCESS_NOISE,
};

/// Noise parameters for a [`ScalarKalman`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanParams {
    /// Initial estimate error
    pub error_estimate: f64,
    /// Measurement noise
    pub error_measure: f64,
    /// Process noise added on every predict step
    pub process_noise: f64,
}

impl Default for KalmanParams {
    fn default() -> Self {
        Self {
            error_estimate: DEFAULT_KALMAN_ERROR_ESTIMATE,
            error_measure: DEFAULT_KALMAN_ERROR_MEASURE,
            process_noise: DEFAULT_KALMAN_PROCESS_NOISE,
        }
    }
}

/// One-dimensional Kalman estimator without a velocity term.
///
/// The first measurement seeds the estimate and is returned unchanged.
#[derive(Debug, Clone)]
pub struct ScalarKalman {
    params: KalmanParams,
    estimate: Option<f64>,
    error_estimate: f64,
}

impl ScalarKalman {
    /// Create a new estimator
    ///
    /// # Panics
    ///
    /// Panics if the measurement noise is not positive or the process noise is negative
    #[must_use]
    pub fn new(params: KalmanParams) -> Self {
        assert!(params.error_measure > 0.0, "Measurement noise must be positive");
        assert!(params.process_noise >= 0.0, "Process noise must be non-negative");
        Self {
            params,
            estimate: None,
            error_estimate: params.error_estimate,
        }
    }

    /// Fold one measurement into the running estimate
    pub fn update(&mut self, measurement: f64) -> f64 {
        let Some(estimate) = self.estimate else {
            self.estimate = Some(measurement);
            return measurement;
        };

        // predict
        self.error_estimate += self.params.process_noise;

        let gain = self.error_estimate / (self.error_estimate + self.params.error_measure);
        let updated = gain.mul_add(measurement - estimate, estimate);
        self.error_estimate *= 1.0 - gain;
        self.estimate = Some(updated);

        updated
    }

    /// Re-seed the estimate and restore the initial error
    pub fn seed(&mut self, value: f64) {
        self.estimate = Some(value);
        self.error_estimate = self.params.error_estimate;
    }

    #[must_use]
    pub const fn estimate(&self) -> Option<f64> {
        self.estimate
    }

    #[must_use]
    pub const fn error_estimate(&self) -> f64 {
        self.error_estimate
    }
}

impl AxisFilter for ScalarKalman {
    fn apply(&mut self, value: f64) -> f64 {
        self.update(value)
    }

    fn reset(&mut self) {
        self.estimate = None;
        self.error_estimate = self.params.error_estimate;
    }

    fn name(&self) -> &str {
        "ScalarKalman"
    }
}
