//! Landmark frames and the face-mesh schema used to read them.
//!
//! A [`LandmarkFrame`] is the per-cycle output of the external face-mesh
//! source: normalized 2D points in [0, 1] per axis, indexed by a fixed
//! anatomical schema. The core never mutates a frame; it extracts the few
//! points it needs through [`LandmarkSchema::extract`].

use crate::{Error, Result};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Normalized landmark coordinate
pub type Point = Point2<f64>;

/// One detection cycle worth of normalized landmarks
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    points: Vec<Point>,
}

impl LandmarkFrame {
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build a frame from `(x, y)` pairs
    #[must_use]
    pub fn from_xy(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// Indices of the landmarks the pipeline reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkSchema {
    pub nose_tip: usize,
    pub left_eye_top: usize,
    pub left_eye_bottom: usize,
    pub left_eye_inner: usize,
    pub left_eye_outer: usize,
    pub right_eye_top: usize,
    pub right_eye_bottom: usize,
    pub right_eye_inner: usize,
    pub right_eye_outer: usize,
    /// Upper inner lip
    pub upper_lip: usize,
    /// Lower inner lip
    pub lower_lip: usize,
    pub mouth_left: usize,
    pub mouth_right: usize,
}

impl Default for LandmarkSchema {
    /// 468-point face mesh layout
    fn default() -> Self {
        Self {
            nose_tip: 1,
            left_eye_top: 159,
            left_eye_bottom: 145,
            left_eye_inner: 133,
            left_eye_outer: 33,
            right_eye_top: 386,
            right_eye_bottom: 374,
            right_eye_inner: 362,
            right_eye_outer: 263,
            upper_lip: 13,
            lower_lip: 14,
            mouth_left: 61,
            mouth_right: 291,
        }
    }
}

/// Four points outlining one eye
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeLandmarks {
    pub top: Point,
    pub bottom: Point,
    pub inner: Point,
    pub outer: Point,
}

/// Four points outlining the inner mouth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouthLandmarks {
    pub upper: Point,
    pub lower: Point,
    pub left: Point,
    pub right: Point,
}

/// The subset of a frame consumed by mapping and gesture detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLandmarks {
    pub nose: Point,
    pub left_eye: EyeLandmarks,
    pub right_eye: EyeLandmarks,
    pub mouth: MouthLandmarks,
}

impl LandmarkSchema {
    fn eye_indices(&self) -> ([usize; 4], [usize; 4]) {
        (
            [self.left_eye_top, self.left_eye_bottom, self.left_eye_inner, self.left_eye_outer],
            [self.right_eye_top, self.right_eye_bottom, self.right_eye_inner, self.right_eye_outer],
        )
    }

    fn mouth_indices(&self) -> [usize; 4] {
        [self.upper_lip, self.lower_lip, self.mouth_left, self.mouth_right]
    }

    /// Smallest frame length that contains every index
    #[must_use]
    pub fn required_len(&self) -> usize {
        let (left, right) = self.eye_indices();
        left.into_iter()
            .chain(right)
            .chain(self.mouth_indices())
            .chain(std::iter::once(self.nose_tip))
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Reject schemas whose point groups reuse an index
    pub fn validate(&self) -> Result<()> {
        let (left, right) = self.eye_indices();
        for (name, group) in [("left eye", left), ("right eye", right), ("mouth", self.mouth_indices())] {
            for (i, a) in group.iter().enumerate() {
                if group[i + 1..].contains(a) {
                    return Err(Error::ConfigError(format!(
                        "Landmark index {a} used twice in the {name} group"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Pull the named points out of a frame, `None` when the frame is too short
    #[must_use]
    pub fn extract(&self, frame: &LandmarkFrame) -> Option<FaceLandmarks> {
        if frame.len() < self.required_len() {
            return None;
        }

        let eye = |top: usize, bottom: usize, inner: usize, outer: usize| -> Option<EyeLandmarks> {
            Some(EyeLandmarks {
                top: frame.get(top)?,
                bottom: frame.get(bottom)?,
                inner: frame.get(inner)?,
                outer: frame.get(outer)?,
            })
        };

        Some(FaceLandmarks {
            nose: frame.get(self.nose_tip)?,
            left_eye: eye(self.left_eye_top, self.left_eye_bottom, self.left_eye_inner, self.left_eye_outer)?,
            right_eye: eye(
                self.right_eye_top,
                self.right_eye_bottom,
                self.right_eye_inner,
                self.right_eye_outer,
            )?,
            mouth: MouthLandmarks {
                upper: frame.get(self.upper_lip)?,
                lower: frame.get(self.lower_lip)?,
                left: frame.get(self.mouth_left)?,
                right: frame.get(self.mouth_right)?,
            },
        })
    }
}
