//! Calibration state machine.
//!
//! `Uncalibrated -> Countdown(n, .., 1) -> Calibrated`. The countdown is
//! driven by frame timestamps; when it elapses the nose position of the
//! current frame becomes the reference. Re-calibrating while calibrated
//! keeps the old reference active until the new one is captured.

use crate::{config::CalibrationConfig, landmarks::Point};
use log::{debug, info};
use std::time::Duration;

/// Observable calibration phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationPhase {
    /// No reference captured yet
    Uncalibrated,
    /// Counting down; `remaining` is the displayed step
    Countdown { remaining: u32 },
    /// Reference captured
    Calibrated,
}

/// Reference capture and countdown bookkeeping
#[derive(Debug, Clone)]
pub struct Calibration {
    steps: u32,
    step: Duration,
    countdown_started: Option<Duration>,
    reference: Option<Point>,
}

impl Calibration {
    #[must_use]
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            steps: config.countdown_steps,
            step: config.step(),
            countdown_started: None,
            reference: None,
        }
    }

    /// Begin (or restart) the countdown
    pub fn start(&mut self, now: Duration) {
        info!("Calibration countdown started ({} steps)", self.steps);
        self.countdown_started = Some(now);
    }

    /// Advance the countdown; returns the new reference on the frame it is captured.
    ///
    /// When the countdown has elapsed but `nose` is `None` the capture waits
    /// for the next frame with a face.
    pub fn advance(&mut self, now: Duration, nose: Option<Point>) -> Option<Point> {
        let started = self.countdown_started?;
        let elapsed = now.saturating_sub(started);
        if elapsed < self.step * self.steps {
            return None;
        }

        let Some(nose) = nose else {
            debug!("Calibration countdown elapsed without a face, waiting");
            return None;
        };
        self.capture(nose);
        Some(nose)
    }

    /// Capture `nose` as the reference immediately
    pub fn capture(&mut self, nose: Point) {
        info!("Calibrated at ({:.4}, {:.4})", nose.x, nose.y);
        self.countdown_started = None;
        self.reference = Some(nose);
    }

    /// Forget the reference and any running countdown
    pub fn clear(&mut self) {
        self.countdown_started = None;
        self.reference = None;
    }

    #[must_use]
    pub const fn reference(&self) -> Option<Point> {
        self.reference
    }

    #[must_use]
    pub const fn is_calibrated(&self) -> bool {
        self.reference.is_some()
    }

    #[must_use]
    pub const fn is_counting_down(&self) -> bool {
        self.countdown_started.is_some()
    }

    /// Current phase as seen at `now`
    #[must_use]
    pub fn phase(&self, now: Duration) -> CalibrationPhase {
        if let Some(started) = self.countdown_started {
            let elapsed = now.saturating_sub(started);
            let done = if self.step.is_zero() {
                self.steps
            } else {
                u32::try_from(elapsed.as_millis() / self.step.as_millis()).unwrap_or(u32::MAX)
            };
            return CalibrationPhase::Countdown {
                remaining: self.steps.saturating_sub(done).max(1),
            };
        }
        if self.reference.is_some() {
            CalibrationPhase::Calibrated
        } else {
            CalibrationPhase::Uncalibrated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn calibration() -> Calibration {
        Calibration::new(&CalibrationConfig::default())
    }

    #[test]
    fn test_countdown_steps() {
        let mut c = calibration();
        assert_eq!(c.phase(ms(0)), CalibrationPhase::Uncalibrated);

        c.start(ms(100));
        assert_eq!(c.phase(ms(100)), CalibrationPhase::Countdown { remaining: 3 });
        assert_eq!(c.phase(ms(1150)), CalibrationPhase::Countdown { remaining: 2 });
        assert_eq!(c.phase(ms(2200)), CalibrationPhase::Countdown { remaining: 1 });

        let nose = Point::new(0.48, 0.52);
        assert_eq!(c.advance(ms(3000), Some(nose)), None);
        assert_eq!(c.advance(ms(3100), Some(nose)), Some(nose));
        assert_eq!(c.phase(ms(3100)), CalibrationPhase::Calibrated);
        assert_eq!(c.reference(), Some(nose));
    }

    #[test]
    fn test_waits_for_face() {
        let mut c = calibration();
        c.start(ms(0));
        assert_eq!(c.advance(ms(3500), None), None);
        assert!(c.is_counting_down());
        let nose = Point::new(0.5, 0.5);
        assert_eq!(c.advance(ms(3600), Some(nose)), Some(nose));
        assert!(!c.is_counting_down());
    }

    #[test]
    fn test_recalibration_keeps_old_reference_until_capture() {
        let mut c = calibration();
        let first = Point::new(0.4, 0.4);
        c.capture(first);
        c.start(ms(0));
        assert_eq!(c.reference(), Some(first));

        let second = Point::new(0.6, 0.6);
        c.advance(ms(3000), Some(second));
        assert_eq!(c.reference(), Some(second));
    }

    #[test]
    fn test_zero_step_countdown_completes_immediately() {
        let mut c = Calibration::new(&CalibrationConfig {
            countdown_steps: 0,
            step_ms: 0,
        });
        c.start(ms(10));
        let nose = Point::new(0.5, 0.5);
        assert_eq!(c.advance(ms(10), Some(nose)), Some(nose));
    }

    #[test]
    fn test_clear() {
        let mut c = calibration();
        c.capture(Point::new(0.5, 0.5));
        c.start(ms(0));
        c.clear();
        assert!(!c.is_calibrated());
        assert_eq!(c.phase(ms(0)), CalibrationPhase::Uncalibrated);
    }
}
