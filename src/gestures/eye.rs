//! Eye aspect ratio and wink-to-click detection.
//!
//! Each eye is latched closed below `ear_closed` and open above `ear_open`;
//! between the two thresholds it keeps its previous state. A wink is one eye
//! going from open to closed while the other stays open. Each side has its
//! own cooldown so a sustained or repeated wink fires at most once per window.

use crate::{
    config::GestureConfig, constants::EPSILON, dispatch::MouseButton, landmarks::EyeLandmarks,
};
use log::debug;
use nalgebra::distance;
use std::time::Duration;

/// Vertical lid distance over eye width
#[must_use]
pub fn eye_aspect_ratio(eye: &EyeLandmarks) -> f64 {
    let vertical = distance(&eye.top, &eye.bottom);
    let horizontal = distance(&eye.inner, &eye.outer);
    vertical / (horizontal + EPSILON)
}

/// Hysteresis latch for one eye
#[derive(Debug, Clone, Copy, Default)]
struct EyeLatch {
    closed: bool,
}

impl EyeLatch {
    fn update(&mut self, ear: f64, closed_below: f64, open_above: f64) -> bool {
        if ear < closed_below {
            self.closed = true;
        } else if ear > open_above {
            self.closed = false;
        }
        self.closed
    }
}

/// Per-frame eye state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeReport {
    pub left_ear: f64,
    pub right_ear: f64,
    pub left_closed: bool,
    pub right_closed: bool,
    /// Both eyes above the wide-open threshold; computed but not bound to an action
    pub wide_open: bool,
    /// Click fired on this frame
    pub wink: Option<MouseButton>,
}

/// Wink detector with per-side cooldown
#[derive(Debug, Clone)]
pub struct WinkDetector {
    closed_below: f64,
    open_above: f64,
    wide_above: f64,
    cooldown: Duration,
    enabled: bool,
    left: EyeLatch,
    right: EyeLatch,
    last_left_click: Option<Duration>,
    last_right_click: Option<Duration>,
}

impl WinkDetector {
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            closed_below: config.ear_closed,
            open_above: config.ear_open,
            wide_above: config.ear_wide,
            cooldown: config.click_cooldown(),
            enabled: config.enable_clicks,
            left: EyeLatch::default(),
            right: EyeLatch::default(),
            last_left_click: None,
            last_right_click: None,
        }
    }

    /// Feed both eyes' landmarks for one frame
    pub fn update(&mut self, left: &EyeLandmarks, right: &EyeLandmarks, now: Duration) -> EyeReport {
        self.update_ear(eye_aspect_ratio(left), eye_aspect_ratio(right), now)
    }

    /// Feed precomputed aspect ratios for one frame
    pub fn update_ear(&mut self, left_ear: f64, right_ear: f64, now: Duration) -> EyeReport {
        let was_left_closed = self.left.closed;
        let was_right_closed = self.right.closed;
        let left_closed = self.left.update(left_ear, self.closed_below, self.open_above);
        let right_closed = self.right.update(right_ear, self.closed_below, self.open_above);

        let wink = if left_closed && !right_closed && !was_left_closed {
            self.fire(MouseButton::Left, now)
        } else if right_closed && !left_closed && !was_right_closed {
            self.fire(MouseButton::Right, now)
        } else {
            None
        };

        EyeReport {
            left_ear,
            right_ear,
            left_closed,
            right_closed,
            wide_open: left_ear > self.wide_above && right_ear > self.wide_above,
            wink,
        }
    }

    /// Turn click emission on or off; eye state is tracked either way
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn fire(&mut self, button: MouseButton, now: Duration) -> Option<MouseButton> {
        if !self.enabled {
            return None;
        }
        let last = match button {
            MouseButton::Left => &mut self.last_left_click,
            MouseButton::Right => &mut self.last_right_click,
        };
        if let Some(previous) = *last {
            if now.saturating_sub(previous) < self.cooldown {
                debug!("{button:?} wink suppressed by cooldown");
                return None;
            }
        }
        *last = Some(now);
        Some(button)
    }

    pub fn reset(&mut self) {
        self.left = EyeLatch::default();
        self.right = EyeLatch::default();
        self.last_left_click = None;
        self.last_right_click = None;
    }
}
