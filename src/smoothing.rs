//! Four-layer cursor smoothing pipeline.
//!
//! Each axis runs the same chain, in this order:
//! 1. median over the last raw targets (impulse rejection)
//! 2. scalar Kalman estimate of the median
//! 3. velocity-adaptive exponential smoothing toward the Kalman estimate
//! 4. quadratic Bezier easing whose control point leans into the motion
//!
//! The axes share structure and parameters but never mix state; the only
//! cross-axis quantity is the velocity magnitude feeding the adaptive factor.

use crate::{
    config::SmoothingConfig,
    filters::{
        bezier,
        kalman::{KalmanParams, ScalarKalman},
        lerp,
        median::MedianFilter,
        AdaptiveFactor, AxisFilter,
    },
    utils::safe_cast::f64_to_i32_clamp,
};
use std::time::Duration;

/// Parameters shared by both axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmootherParams {
    pub adaptive: AdaptiveFactor,
    pub velocity_blend: f64,
    pub bezier_factor: f64,
    pub output_lerp: f64,
    pub median_window: usize,
    pub kalman: KalmanParams,
}

impl From<&SmoothingConfig> for SmootherParams {
    fn from(config: &SmoothingConfig) -> Self {
        Self {
            adaptive: config.adaptive_factor(),
            velocity_blend: config.velocity_blend,
            bezier_factor: config.bezier_factor,
            output_lerp: config.output_lerp,
            median_window: config.median_window,
            kalman: config.kalman_params(),
        }
    }
}

/// Filter state of one axis
#[derive(Debug, Clone)]
struct AxisSmoother {
    raw: MedianFilter,
    kalman: ScalarKalman,
    velocity: f64,
    last_target: Option<f64>,
    smooth: Option<f64>,
    output: f64,
}

impl AxisSmoother {
    fn new(params: &SmootherParams) -> Self {
        Self {
            raw: MedianFilter::new(params.median_window),
            kalman: ScalarKalman::new(params.kalman),
            velocity: 0.0,
            last_target: None,
            smooth: None,
            output: 0.0,
        }
    }

    /// Median then Kalman
    fn measure(&mut self, raw_target: f64) -> f64 {
        self.raw.push(raw_target);
        let median = self.raw.median().unwrap_or(raw_target);
        self.kalman.update(median)
    }

    /// `dt` is the elapsed milliseconds since the previous target, if any
    fn track_velocity(&mut self, target: f64, dt: Option<f64>, blend: f64) {
        if let (Some(last), Some(dt)) = (self.last_target, dt) {
            if dt > 0.0 {
                self.velocity = lerp(self.velocity, (target - last) / dt, blend);
            }
        }
        self.last_target = Some(target);
    }

    fn ease(&mut self, target: f64, factor: f64, params: &SmootherParams) -> f64 {
        let smooth = match self.smooth {
            Some(smooth) => (target - smooth).mul_add(factor, smooth),
            None => {
                self.output = target;
                target
            }
        };
        self.smooth = Some(smooth);

        let control = (self.output + smooth) / 2.0 + self.velocity * params.bezier_factor;
        self.output = bezier(self.output, control, smooth, params.output_lerp);
        self.output
    }

    fn clear(&mut self) {
        self.raw.reset();
        self.kalman.reset();
        self.velocity = 0.0;
        self.last_target = None;
        self.smooth = None;
        self.output = 0.0;
    }

    fn center(&mut self, value: f64) {
        self.clear();
        self.kalman.seed(value);
        self.smooth = Some(value);
        self.output = value;
    }
}

/// Per-session smoothing state for both axes
#[derive(Debug, Clone)]
pub struct SmoothingPipeline {
    params: SmootherParams,
    x: AxisSmoother,
    y: AxisSmoother,
    last_time: Option<Duration>,
}

impl SmoothingPipeline {
    #[must_use]
    pub fn new(params: SmootherParams) -> Self {
        Self {
            x: AxisSmoother::new(&params),
            y: AxisSmoother::new(&params),
            params,
            last_time: None,
        }
    }

    /// Run one frame's raw target through all four layers and return the
    /// rounded cursor position
    pub fn update(&mut self, raw_target: (f64, f64), now: Duration) -> (i32, i32) {
        let target_x = self.x.measure(raw_target.0);
        let target_y = self.y.measure(raw_target.1);

        let dt = self
            .last_time
            .and_then(|last| now.checked_sub(last))
            .map(|elapsed| elapsed.as_secs_f64() * 1000.0);
        self.x.track_velocity(target_x, dt, self.params.velocity_blend);
        self.y.track_velocity(target_y, dt, self.params.velocity_blend);
        self.last_time = Some(now);

        let factor = self.params.adaptive.compute(self.x.velocity, self.y.velocity);
        let out_x = self.x.ease(target_x, factor, &self.params);
        let out_y = self.y.ease(target_y, factor, &self.params);

        (
            f64_to_i32_clamp(out_x.round(), i32::MIN, i32::MAX),
            f64_to_i32_clamp(out_y.round(), i32::MIN, i32::MAX),
        )
    }

    /// Drop every estimate; the next frame seeds the pipeline afresh
    pub fn reset(&mut self) {
        self.x.clear();
        self.y.clear();
        self.last_time = None;
    }

    /// Reset to a neutral baseline resting at `center`
    pub fn reset_to(&mut self, center: (f64, f64)) {
        self.x.center(center.0);
        self.y.center(center.1);
        self.last_time = None;
    }

    /// Replace the base smoothing factor, keeping all filter state
    pub fn set_base_factor(&mut self, base: f64) {
        self.params.adaptive.base = base;
    }

    #[must_use]
    pub const fn params(&self) -> &SmootherParams {
        &self.params
    }

    /// Unrounded output position, `None` before the first frame
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        self.x.smooth.map(|_| (self.x.output, self.y.output))
    }

    /// Smoothed velocity in px/ms
    #[must_use]
    pub const fn velocity(&self) -> (f64, f64) {
        (self.x.velocity, self.y.velocity)
    }

    /// Current adaptive factor
    #[must_use]
    pub fn adaptive_factor(&self) -> f64 {
        self.params.adaptive.compute(self.x.velocity, self.y.velocity)
    }

    /// Number of raw targets held by the median stage
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.x.raw.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmoothingConfig;

    fn pipeline() -> SmoothingPipeline {
        SmoothingPipeline::new(SmootherParams::from(&SmoothingConfig::default()))
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_first_frame_seeds_output() {
        let mut p = pipeline();
        assert_eq!(p.position(), None);
        // no velocity yet, so the Bezier stage sits on the seed
        assert_eq!(p.update((300.0, 200.0), ms(0)), (300, 200));
        let (x, y) = p.position().unwrap();
        assert!((x - 300.0).abs() < 1e-9);
        assert!((y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_moves_toward_target_gradually() {
        let mut p = pipeline();
        p.reset_to((960.0, 540.0));
        let (x1, _) = p.update((1200.0, 540.0), ms(33));
        assert!(x1 >= 960 && x1 < 1200);

        let mut last = x1;
        for frame in 2..400 {
            let (x, y) = p.update((1200.0, 540.0), ms(33 * frame));
            assert!(x >= last - 1, "output regressed at frame {frame}");
            assert_eq!(y, 540);
            last = x;
        }
        assert!((last - 1200).abs() <= 1);
    }

    #[test]
    fn test_median_rejects_single_outlier() {
        let mut p = pipeline();
        p.reset_to((500.0, 500.0));
        for frame in 1..=6 {
            p.update((500.0, 500.0), ms(16 * frame));
        }
        let (x, y) = p.update((1900.0, 1000.0), ms(16 * 7));
        assert_eq!((x, y), (500, 500));
    }

    #[test]
    fn test_velocity_tracks_motion_direction() {
        let mut p = pipeline();
        p.reset_to((0.0, 0.0));
        for frame in 1..20u64 {
            let pos = frame as f64 * 10.0;
            p.update((pos, -pos), ms(10 * frame));
        }
        let (vx, vy) = p.velocity();
        assert!(vx > 0.0);
        assert!(vy < 0.0);
        assert!(p.adaptive_factor() > p.params().adaptive.base);
    }

    #[test]
    fn test_zero_dt_keeps_velocity() {
        let mut p = pipeline();
        p.reset_to((0.0, 0.0));
        p.update((0.0, 0.0), ms(10));
        p.update((100.0, 0.0), ms(10));
        assert_eq!(p.velocity(), (0.0, 0.0));
    }

    #[test]
    fn test_reset_to_center_is_neutral() {
        let mut p = pipeline();
        for frame in 0..30u64 {
            p.update((frame as f64 * 40.0, 100.0), ms(16 * frame));
        }
        p.reset_to((960.0, 540.0));
        assert_eq!(p.velocity(), (0.0, 0.0));
        assert_eq!(p.buffered(), 0);
        assert_eq!(p.position(), Some((960.0, 540.0)));
        assert_eq!(p.update((960.0, 540.0), ms(1000)), (960, 540));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut p = pipeline();
        p.update((10.0, 10.0), ms(0));
        p.update((20.0, 20.0), ms(16));
        p.reset();
        assert_eq!(p.position(), None);
        assert_eq!(p.buffered(), 0);
        assert_eq!(p.update((700.0, 300.0), ms(32)), (700, 300));
    }

    #[test]
    fn test_set_base_factor() {
        let mut p = pipeline();
        p.set_base_factor(0.035);
        assert_eq!(p.params().adaptive.base, 0.035);
        assert!((p.adaptive_factor() - 0.035).abs() < 1e-12);
    }
}
