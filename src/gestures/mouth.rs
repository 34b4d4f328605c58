//! Mouth openness and the drag state machine.

use crate::{config::GestureConfig, constants::EPSILON, landmarks::MouthLandmarks};
use nalgebra::distance;

/// Scale-invariant mouth openness: lip gap over mouth width, times `scale`
#[must_use]
pub fn mouth_openness(mouth: &MouthLandmarks, scale: f64) -> f64 {
    let gap = distance(&mouth.upper, &mouth.lower);
    let width = distance(&mouth.left, &mouth.right);
    gap / (width + EPSILON) * scale
}

/// Drag state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Transition produced by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTransition {
    /// Mouth opened past the threshold: press
    Started,
    /// Mouth closed again: release
    Ended,
}

/// `Idle <-> Dragging` on the threshold crossings of mouth openness
#[derive(Debug, Clone)]
pub struct DragDetector {
    threshold: f64,
    state: DragState,
}

impl DragDetector {
    #[must_use]
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            threshold: config.mouth_open_threshold,
            state: DragState::Idle,
        }
    }

    /// Feed one frame's openness
    pub fn update(&mut self, openness: f64) -> Option<DragTransition> {
        let open = openness > self.threshold;
        match (self.state, open) {
            (DragState::Idle, true) => {
                self.state = DragState::Dragging;
                Some(DragTransition::Started)
            }
            (DragState::Dragging, false) => {
                self.state = DragState::Idle;
                Some(DragTransition::Ended)
            }
            _ => None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}
