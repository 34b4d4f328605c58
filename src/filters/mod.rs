//! Signal filtering primitives for smoothing cursor targets.
//!
//! The smoothing pipeline chains these per axis: a median over the most
//! recent raw targets rejects impulsive outliers, a scalar Kalman estimator
//! weights the running estimate against new measurements, and the
//! interpolation helpers drive the velocity-adaptive easing stages.

/// Scalar Kalman estimator
pub mod kalman;

/// Median over a bounded FIFO of recent samples
pub mod median;

/// Trait for single-axis filters
pub trait AxisFilter: Send + Sync {
    /// Feed one sample and return the filtered value
    fn apply(&mut self, value: f64) -> f64;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// Linear interpolation between `a` and `b`
#[inline]
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a).mul_add(t, a)
}

/// Quadratic Bezier through `p0`, control `p1`, end `p2`
#[inline]
#[must_use]
pub fn bezier(p0: f64, p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * p0 + 2.0 * u * t * p1 + t * t * p2
}

/// Bounds and weighting for the velocity-adaptive smoothing rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveFactor {
    /// Rate at rest
    pub base: f64,
    /// Rate added per unit of velocity magnitude
    pub velocity_influence: f64,
    /// Lower clamp
    pub min: f64,
    /// Upper clamp
    pub max: f64,
}

impl AdaptiveFactor {
    /// Smoothing rate for the current velocity vector.
    ///
    /// Faster motion yields a higher (more responsive) rate; the clamp keeps
    /// the output stable at rest.
    #[must_use]
    pub fn compute(&self, vx: f64, vy: f64) -> f64 {
        let magnitude = vx.hypot(vy);
        let factor = magnitude.mul_add(self.velocity_influence, self.base);
        if factor.is_nan() {
            return self.min;
        }
        factor.clamp(self.min, self.max)
    }
}
