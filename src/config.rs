//! Configuration management for the face cursor pipeline
//!
//! Every tunable of the pipeline lives here: mapping sensitivity, smoothing
//! rates, gesture thresholds, output throttling and the calibration
//! countdown. One `Config` is constructed per session, validated, and handed
//! down to the stages that read it.

use crate::{
    constants::*,
    filters::{kalman::KalmanParams, AdaptiveFactor},
    landmarks::LandmarkSchema,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Landmark-to-screen mapping
    pub cursor: CursorConfig,

    /// Four-layer smoothing pipeline
    pub smoothing: SmoothingConfig,

    /// Wink and mouth gesture detection
    pub gestures: GestureConfig,

    /// Output rate limiting
    pub output: OutputConfig,

    /// Calibration countdown
    pub calibration: CalibrationConfig,

    /// Cosmetic display flags
    pub display: DisplayConfig,

    /// Landmark indices of the face mesh
    pub landmarks: LandmarkSchema,
}

/// Cursor mapping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Sensitivity multiplier (0, 10]
    pub sensitivity: f64,

    /// Fixed gain applied on top of the sensitivity
    pub sensitivity_gain: f64,

    /// Dead zone radius in normalized landmark units [0, 0.5)
    pub dead_zone: f64,

    /// Landmark source frame width
    pub camera_width: u32,

    /// Landmark source frame height
    pub camera_height: u32,

    /// Vertical offset removed per unit of normalized mouth openness
    pub jaw_compensation: f64,
}

/// Smoothing pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Smoothness slider [0, 1]; higher is more responsive
    pub smoothness: f64,

    /// Lower clamp of the adaptive factor
    pub min_factor: f64,

    /// Upper clamp of the adaptive factor
    pub max_factor: f64,

    /// Adaptive factor gain per px/ms of velocity
    pub velocity_influence: f64,

    /// Blend of each new instantaneous velocity sample (0, 1]
    pub velocity_blend: f64,

    /// Control point displacement per px/ms of velocity
    pub bezier_factor: f64,

    /// Step taken along the Bezier curve each frame (0, 1]
    pub output_lerp: f64,

    /// Raw target buffer capacity
    pub median_window: usize,

    /// Kalman noise parameters
    pub kalman: KalmanConfig,
}

/// Scalar Kalman noise configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KalmanConfig {
    /// Initial estimate error
    pub error_estimate: f64,

    /// Measurement noise
    pub error_measure: f64,

    /// Process noise (q)
    pub process_noise: f64,
}

/// Gesture detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// EAR below which an eye latches closed
    pub ear_closed: f64,

    /// EAR above which an eye latches open
    pub ear_open: f64,

    /// EAR above which both eyes count as wide open
    pub ear_wide: f64,

    /// Per-button click cooldown in milliseconds
    pub click_cooldown_ms: u64,

    /// Mouth openness above which a drag is held
    pub mouth_open_threshold: f64,

    /// Scale applied to the lip gap / mouth width ratio
    pub mouth_scale: f64,

    /// Emit clicks on winks
    pub enable_clicks: bool,

    /// Emit mouse down/up on mouth open/close
    pub enable_drag: bool,
}

/// Output throttle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Minimum interval between two move commands
    pub min_interval_ms: u64,

    /// Minimum displacement worth sending, in pixels
    pub jitter_threshold_px: f64,

    /// Interval after which the position is re-sent even without movement
    pub fallback_interval_ms: u64,
}

/// Calibration countdown configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Number of countdown steps before capture
    pub countdown_steps: u32,

    /// Length of each countdown step in milliseconds
    pub step_ms: u64,
}

/// Display configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the face mesh overlay (no pipeline effect)
    pub show_mesh: bool,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            sensitivity_gain: DEFAULT_SENSITIVITY_GAIN,
            dead_zone: DEFAULT_DEAD_ZONE,
            camera_width: DEFAULT_CAMERA_WIDTH,
            camera_height: DEFAULT_CAMERA_HEIGHT,
            jaw_compensation: 0.0,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            smoothness: DEFAULT_SMOOTHNESS,
            min_factor: DEFAULT_MIN_FACTOR,
            max_factor: DEFAULT_MAX_FACTOR,
            velocity_influence: DEFAULT_VELOCITY_INFLUENCE,
            velocity_blend: DEFAULT_VELOCITY_BLEND,
            bezier_factor: DEFAULT_BEZIER_FACTOR,
            output_lerp: DEFAULT_OUTPUT_LERP,
            median_window: DEFAULT_MEDIAN_WINDOW,
            kalman: KalmanConfig::default(),
        }
    }
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self {
            error_estimate: DEFAULT_KALMAN_ERROR_ESTIMATE,
            error_measure: DEFAULT_KALMAN_ERROR_MEASURE,
            process_noise: DEFAULT_KALMAN_PROCESS_NOISE,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            ear_closed: EAR_CLOSED_THRESHOLD,
            ear_open: EAR_OPEN_THRESHOLD,
            ear_wide: EAR_WIDE_THRESHOLD,
            click_cooldown_ms: DEFAULT_CLICK_COOLDOWN_MS,
            mouth_open_threshold: MOUTH_OPEN_THRESHOLD,
            mouth_scale: MOUTH_OPENNESS_SCALE,
            enable_clicks: true,
            enable_drag: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_MIN_SEND_INTERVAL_MS,
            jitter_threshold_px: DEFAULT_JITTER_THRESHOLD_PX,
            fallback_interval_ms: DEFAULT_FALLBACK_INTERVAL_MS,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            countdown_steps: DEFAULT_COUNTDOWN_STEPS,
            step_ms: DEFAULT_COUNTDOWN_STEP_MS,
        }
    }
}

impl SmoothingConfig {
    /// Base smoothing factor derived from a 0-1 smoothness slider
    #[must_use]
    pub fn base_factor_for(slider: f64) -> f64 {
        slider.mul_add(SMOOTHNESS_SPAN, SMOOTHNESS_BASE)
    }

    /// Base smoothing factor for the configured slider
    #[must_use]
    pub fn base_factor(&self) -> f64 {
        Self::base_factor_for(self.smoothness)
    }

    #[must_use]
    pub fn adaptive_factor(&self) -> AdaptiveFactor {
        AdaptiveFactor {
            base: self.base_factor(),
            velocity_influence: self.velocity_influence,
            min: self.min_factor,
            max: self.max_factor,
        }
    }

    #[must_use]
    pub const fn kalman_params(&self) -> KalmanParams {
        KalmanParams {
            error_estimate: self.kalman.error_estimate,
            error_measure: self.kalman.error_measure,
            process_noise: self.kalman.process_noise,
        }
    }
}

impl GestureConfig {
    #[must_use]
    pub const fn click_cooldown(&self) -> Duration {
        Duration::from_millis(self.click_cooldown_ms)
    }
}

impl OutputConfig {
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    #[must_use]
    pub const fn fallback_interval(&self) -> Duration {
        Duration::from_millis(self.fallback_interval_ms)
    }
}

impl CalibrationConfig {
    #[must_use]
    pub const fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let cursor = &self.cursor;
        if !(cursor.sensitivity > 0.0 && cursor.sensitivity <= 10.0) {
            return Err(Error::ConfigError("Sensitivity must be in (0, 10]".to_string()));
        }
        if !(cursor.sensitivity_gain.is_finite() && cursor.sensitivity_gain > 0.0) {
            return Err(Error::ConfigError("Sensitivity gain must be finite and positive".to_string()));
        }
        if !(0.0..0.5).contains(&cursor.dead_zone) {
            return Err(Error::ConfigError("Dead zone must be in [0, 0.5)".to_string()));
        }
        if cursor.camera_width == 0 || cursor.camera_height == 0 {
            return Err(Error::ConfigError("Camera dimensions must be non-zero".to_string()));
        }
        if !cursor.jaw_compensation.is_finite() {
            return Err(Error::ConfigError("Jaw compensation must be finite".to_string()));
        }

        let smoothing = &self.smoothing;
        if !(0.0..=1.0).contains(&smoothing.smoothness) {
            return Err(Error::ConfigError("Smoothness must be between 0.0 and 1.0".to_string()));
        }
        if !(smoothing.min_factor > 0.0 && smoothing.min_factor <= smoothing.max_factor && smoothing.max_factor <= 1.0) {
            return Err(Error::ConfigError(
                "Adaptive factor bounds must satisfy 0 < min <= max <= 1".to_string(),
            ));
        }
        if !(smoothing.velocity_influence.is_finite() && smoothing.velocity_influence >= 0.0) {
            return Err(Error::ConfigError(
                "Velocity influence must be finite and non-negative".to_string(),
            ));
        }
        if !(smoothing.velocity_blend > 0.0 && smoothing.velocity_blend <= 1.0) {
            return Err(Error::ConfigError("Velocity blend must be in (0, 1]".to_string()));
        }
        if !smoothing.bezier_factor.is_finite() {
            return Err(Error::ConfigError("Bezier factor must be finite".to_string()));
        }
        if !(smoothing.output_lerp > 0.0 && smoothing.output_lerp <= 1.0) {
            return Err(Error::ConfigError("Output lerp must be in (0, 1]".to_string()));
        }
        if smoothing.median_window == 0 {
            return Err(Error::ConfigError(
                "Median window size must be greater than 0".to_string(),
            ));
        }
        let kalman = &smoothing.kalman;
        if ![kalman.error_estimate, kalman.error_measure, kalman.process_noise]
            .iter()
            .all(|value| value.is_finite())
        {
            return Err(Error::ConfigError("Kalman parameters must be finite".to_string()));
        }
        if !(kalman.error_measure > 0.0 && kalman.error_estimate >= 0.0 && kalman.process_noise >= 0.0) {
            return Err(Error::ConfigError(
                "Kalman measurement noise must be positive, initial error and process noise non-negative"
                    .to_string(),
            ));
        }

        let gestures = &self.gestures;
        if !(gestures.ear_closed > 0.0 && gestures.ear_closed < gestures.ear_open) {
            return Err(Error::ConfigError(
                "EAR thresholds must satisfy 0 < closed < open".to_string(),
            ));
        }
        if !(gestures.ear_wide.is_finite() && gestures.ear_wide > gestures.ear_open) {
            return Err(Error::ConfigError("Wide-open EAR must exceed the open threshold".to_string()));
        }
        if !(gestures.mouth_open_threshold.is_finite()
            && gestures.mouth_scale.is_finite()
            && gestures.mouth_open_threshold > 0.0
            && gestures.mouth_scale > 0.0)
        {
            return Err(Error::ConfigError(
                "Mouth threshold and scale must be finite and positive".to_string(),
            ));
        }

        let output = &self.output;
        if output.min_interval_ms == 0 {
            return Err(Error::ConfigError("Output interval must be greater than 0".to_string()));
        }
        if output.fallback_interval_ms < output.min_interval_ms {
            return Err(Error::ConfigError(
                "Fallback interval must not be shorter than the output interval".to_string(),
            ));
        }
        if !(output.jitter_threshold_px.is_finite() && output.jitter_threshold_px >= 0.0) {
            return Err(Error::ConfigError(
                "Jitter threshold must be finite and non-negative".to_string(),
            ));
        }

        if self.calibration.step_ms == 0 && self.calibration.countdown_steps > 0 {
            return Err(Error::ConfigError(
                "Countdown step length must be greater than 0".to_string(),
            ));
        }

        self.landmarks.validate()?;

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face Cursor Configuration

# Landmark-to-screen mapping
cursor:
  sensitivity: 1.0
  sensitivity_gain: 2.5
  dead_zone: 0.01
  camera_width: 640
  camera_height: 480
  jaw_compensation: 0.0

# Smoothing pipeline
smoothing:
  smoothness: 0.5
  min_factor: 0.02
  max_factor: 0.35
  velocity_influence: 0.05
  velocity_blend: 0.3
  bezier_factor: 2.0
  output_lerp: 0.1
  median_window: 8
  kalman:
    error_estimate: 1.0
    error_measure: 1.0
    process_noise: 0.1

# Gestures
gestures:
  ear_closed: 0.15
  ear_open: 0.2
  ear_wide: 0.35
  click_cooldown_ms: 600
  mouth_open_threshold: 15.0
  mouth_scale: 150.0
  enable_clicks: true
  enable_drag: true

# Output throttle
output:
  min_interval_ms: 8
  jitter_threshold_px: 1.5
  fallback_interval_ms: 100

# Calibration countdown
calibration:
  countdown_steps: 3
  step_ms: 1000

# Display
display:
  show_mesh: false

# Face mesh landmark indices
landmarks:
  nose_tip: 1
  left_eye_top: 159
  left_eye_bottom: 145
  left_eye_inner: 133
  left_eye_outer: 33
  right_eye_top: 386
  right_eye_bottom: 374
  right_eye_inner: 362
  right_eye_outer: 263
  upper_lip: 13
  lower_lip: 14
  mouth_left: 61
  mouth_right: 291
"#;
