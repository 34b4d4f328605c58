//! Gesture detection on the landmark stream.
//!
//! Winks become left/right clicks, an open mouth holds the button down for
//! dragging. Both detectors read the same frame the cursor mapping reads and
//! keep their own state across frames.

/// Eye aspect ratio and wink detection
pub mod eye;

/// Mouth openness and drag detection
pub mod mouth;

use crate::{config::GestureConfig, dispatch::MouseButton, landmarks::FaceLandmarks};
use eye::{EyeReport, WinkDetector};
use log::info;
use mouth::{mouth_openness, DragDetector, DragTransition};
use std::time::Duration;

/// Gesture emitted by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Click(MouseButton),
    DragStart,
    DragEnd,
}

/// Everything the gesture detectors computed for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct GestureReport {
    pub eyes: EyeReport,
    pub mouth_openness: f64,
    pub dragging: bool,
    pub events: Vec<GestureEvent>,
}

impl GestureReport {
    /// Display label for the eyes
    #[must_use]
    pub fn eye_label(&self) -> &'static str {
        match (self.eyes.wink, self.eyes.left_closed, self.eyes.right_closed) {
            (Some(MouseButton::Left), ..) => "Left click",
            (Some(MouseButton::Right), ..) => "Right click",
            (None, true, true) => "Eyes closed",
            (None, true, false) => "Left eye closed",
            (None, false, true) => "Right eye closed",
            (None, false, false) => "Eyes open",
        }
    }

    /// Display label for the mouth
    #[must_use]
    pub fn mouth_label(&self) -> &'static str {
        if self.dragging {
            "Dragging"
        } else {
            "Mouth closed"
        }
    }
}

/// Wink and drag detection with a running gesture counter
#[derive(Debug, Clone)]
pub struct GestureDetector {
    winks: WinkDetector,
    drag: DragDetector,
    mouth_scale: f64,
    enable_drag: bool,
    click_count: u64,
}

impl GestureDetector {
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            winks: WinkDetector::new(config),
            drag: DragDetector::new(config),
            mouth_scale: config.mouth_scale,
            enable_drag: config.enable_drag,
            click_count: 0,
        }
    }

    /// Run both detectors on one frame
    pub fn update(&mut self, face: &FaceLandmarks, now: Duration) -> GestureReport {
        let eyes = self.winks.update(&face.left_eye, &face.right_eye, now);
        let openness = mouth_openness(&face.mouth, self.mouth_scale);
        let mut events = Vec::new();

        if let Some(button) = eyes.wink {
            info!("{button:?} click");
            self.click_count += 1;
            events.push(GestureEvent::Click(button));
        }

        if self.enable_drag {
            match self.drag.update(openness) {
                Some(DragTransition::Started) => {
                    info!("Drag started (openness {openness:.1})");
                    events.push(GestureEvent::DragStart);
                }
                Some(DragTransition::Ended) => {
                    info!("Drag ended");
                    self.click_count += 1;
                    events.push(GestureEvent::DragEnd);
                }
                None => {}
            }
        }

        GestureReport {
            eyes,
            mouth_openness: openness,
            dragging: self.drag.is_dragging(),
            events,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Completed clicks and drags since the last reset
    #[must_use]
    pub const fn click_count(&self) -> u64 {
        self.click_count
    }

    /// Clear all gesture state; returns `true` if a drag was in progress
    pub fn reset(&mut self) -> bool {
        let was_dragging = self.drag.is_dragging();
        self.winks.reset();
        self.drag.reset();
        self.click_count = 0;
        was_dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{EyeLandmarks, MouthLandmarks, Point};

    fn eye(ear: f64) -> EyeLandmarks {
        EyeLandmarks {
            top: Point::new(0.5, 0.5 - ear * 0.05),
            bottom: Point::new(0.5, 0.5 + ear * 0.05),
            inner: Point::new(0.55, 0.5),
            outer: Point::new(0.45, 0.5),
        }
    }

    fn face(left_ear: f64, right_ear: f64, openness: f64) -> FaceLandmarks {
        // width 0.1, so the gap for a given openness is openness / 150 * 0.1
        let gap = openness / 150.0 * 0.1;
        FaceLandmarks {
            nose: Point::new(0.5, 0.5),
            left_eye: eye(left_ear),
            right_eye: eye(right_ear),
            mouth: MouthLandmarks {
                upper: Point::new(0.5, 0.7),
                lower: Point::new(0.5, 0.7 + gap),
                left: Point::new(0.45, 0.7),
                right: Point::new(0.55, 0.7),
            },
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_click_and_drag_counting() {
        let mut g = GestureDetector::new(&GestureConfig::default());
        g.update(&face(0.3, 0.3, 0.0), ms(0));
        let report = g.update(&face(0.1, 0.3, 0.0), ms(33));
        assert_eq!(report.events, vec![GestureEvent::Click(MouseButton::Left)]);
        assert_eq!(report.eye_label(), "Left click");
        assert_eq!(g.click_count(), 1);

        let report = g.update(&face(0.3, 0.3, 40.0), ms(66));
        assert_eq!(report.events, vec![GestureEvent::DragStart]);
        assert_eq!(report.mouth_label(), "Dragging");
        // drag start alone does not count
        assert_eq!(g.click_count(), 1);

        let report = g.update(&face(0.3, 0.3, 2.0), ms(99));
        assert_eq!(report.events, vec![GestureEvent::DragEnd]);
        assert_eq!(g.click_count(), 2);
    }

    #[test]
    fn test_disabled_clicks_still_track_eyes() {
        let config = GestureConfig {
            enable_clicks: false,
            ..GestureConfig::default()
        };
        let mut g = GestureDetector::new(&config);
        g.update(&face(0.3, 0.3, 0.0), ms(0));
        let report = g.update(&face(0.1, 0.3, 0.0), ms(33));
        assert!(report.events.is_empty());
        assert!(report.eyes.left_closed);
        assert_eq!(report.eye_label(), "Left eye closed");
    }

    #[test]
    fn test_reset_reports_active_drag() {
        let mut g = GestureDetector::new(&GestureConfig::default());
        g.update(&face(0.3, 0.3, 40.0), ms(0));
        assert!(g.is_dragging());
        assert!(g.reset());
        assert!(!g.is_dragging());
        assert!(!g.reset());
    }
}
