//! Cursor mapping from calibrated head offset to screen-space targets.
//!
//! The nose offset from the calibration reference passes through a
//! soft-edged dead zone, is scaled by the smaller screen dimension and the
//! sensitivity, mirrored on X (the camera view is mirrored), stretched on X by
//! the screen/camera aspect ratio, and finally clamped onto the screen around
//! its center.

use crate::{
    config::Config,
    constants::{EPSILON, FALLBACK_SCREEN_HEIGHT, FALLBACK_SCREEN_WIDTH},
    landmarks::Point,
    utils::safe_cast::extent,
};
use log::warn;
use nalgebra::Vector2;

/// Screen dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size used when no geometry is available
    #[must_use]
    pub const fn fallback() -> Self {
        Self::new(FALLBACK_SCREEN_WIDTH, FALLBACK_SCREEN_HEIGHT)
    }

    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    #[must_use]
    pub fn aspect(&self) -> f64 {
        extent(self.width) / extent(self.height)
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Source of the current screen geometry
pub trait ScreenGeometry {
    /// Current screen size, `None` when unavailable
    fn screen_size(&self) -> Option<ScreenSize>;
}

impl ScreenGeometry for ScreenSize {
    fn screen_size(&self) -> Option<ScreenSize> {
        Some(*self)
    }
}

/// Ask the provider for the screen size, falling back to 1920x1080
pub fn resolve_screen(provider: Option<&dyn ScreenGeometry>) -> ScreenSize {
    match provider.and_then(|p| p.screen_size()) {
        Some(size) if size.width > 0 && size.height > 0 => size,
        _ => {
            warn!(
                "Screen geometry unavailable, assuming {}x{}",
                FALLBACK_SCREEN_WIDTH, FALLBACK_SCREEN_HEIGHT
            );
            ScreenSize::fallback()
        }
    }
}

/// Soft-edged dead zone: offsets inside `radius` vanish, offsets outside
/// shrink by `radius` so the response is continuous at the boundary
#[must_use]
pub fn apply_dead_zone(offset: Vector2<f64>, radius: f64) -> Vector2<f64> {
    let distance = offset.norm();
    if distance < radius || distance < EPSILON {
        return Vector2::zeros();
    }
    offset * ((distance - radius) / distance)
}

/// Converts head offsets into screen-space cursor targets
#[derive(Debug, Clone, PartialEq)]
pub struct CursorMapper {
    screen: ScreenSize,
    sensitivity: f64,
    sensitivity_gain: f64,
    dead_zone: f64,
    camera_aspect: f64,
    jaw_compensation: f64,
    mouth_scale: f64,
}

impl CursorMapper {
    #[must_use]
    pub fn new(config: &Config, screen: ScreenSize) -> Self {
        Self {
            screen,
            sensitivity: config.cursor.sensitivity,
            sensitivity_gain: config.cursor.sensitivity_gain,
            dead_zone: config.cursor.dead_zone,
            camera_aspect: extent(config.cursor.camera_width) / extent(config.cursor.camera_height),
            jaw_compensation: config.cursor.jaw_compensation,
            mouth_scale: config.gestures.mouth_scale,
        }
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.sensitivity = sensitivity;
    }

    #[must_use]
    pub const fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Ratio of screen aspect to camera aspect
    #[must_use]
    pub fn aspect_compensation(&self) -> f64 {
        self.screen.aspect() / self.camera_aspect
    }

    /// Screen-space displacement for a dead-zoned offset, before aspect compensation
    #[must_use]
    pub fn scale(&self, offset: Vector2<f64>) -> (f64, f64) {
        let base_scale = extent(self.screen.width.min(self.screen.height));
        let multiplier = self.sensitivity * self.sensitivity_gain;
        // camera view is mirrored
        (-offset.x * base_scale * multiplier, offset.y * base_scale * multiplier)
    }

    /// Map the nose position to a clamped screen target
    #[must_use]
    pub fn map(&self, nose: Point, reference: Point, mouth_openness: f64) -> (f64, f64) {
        let mut offset = nose - reference;
        if self.mouth_scale > 0.0 {
            offset.y -= mouth_openness / self.mouth_scale * self.jaw_compensation;
        }

        let offset = apply_dead_zone(offset, self.dead_zone);
        let (move_x, move_y) = self.scale(offset);
        let final_x = move_x * self.aspect_compensation();

        let (cx, cy) = self.screen.center();
        let max_x = extent(self.screen.width) - 1.0;
        let max_y = extent(self.screen.height) - 1.0;
        ((cx + final_x).clamp(0.0, max_x), (cy + move_y).clamp(0.0, max_y))
    }
}
