//! Constants used throughout the library

/// Camera frame width assumed by aspect compensation
pub const DEFAULT_CAMERA_WIDTH: u32 = 640;
/// Camera frame height assumed by aspect compensation
pub const DEFAULT_CAMERA_HEIGHT: u32 = 480;

/// Screen size used when the geometry provider has nothing to offer
pub const FALLBACK_SCREEN_WIDTH: u32 = 1920;
pub const FALLBACK_SCREEN_HEIGHT: u32 = 1080;

/// Cursor mapping defaults
pub const DEFAULT_SENSITIVITY: f64 = 1.0;
pub const DEFAULT_SENSITIVITY_GAIN: f64 = 2.5;
pub const DEFAULT_DEAD_ZONE: f64 = 0.01;

/// Smoothness slider mapping: `base = SMOOTHNESS_BASE + slider * SMOOTHNESS_SPAN`
pub const SMOOTHNESS_BASE: f64 = 0.02;
pub const SMOOTHNESS_SPAN: f64 = 0.015;
pub const DEFAULT_SMOOTHNESS: f64 = 0.5;

/// Adaptive factor bounds and velocity weighting
pub const DEFAULT_MIN_FACTOR: f64 = 0.02;
pub const DEFAULT_MAX_FACTOR: f64 = 0.35;
pub const DEFAULT_VELOCITY_INFLUENCE: f64 = 0.05;

/// Blend applied to each new instantaneous velocity sample
pub const DEFAULT_VELOCITY_BLEND: f64 = 0.3;

/// Bezier stage parameters
pub const DEFAULT_BEZIER_FACTOR: f64 = 2.0;
pub const DEFAULT_OUTPUT_LERP: f64 = 0.1;

/// Raw target buffer capacity for the median stage
pub const DEFAULT_MEDIAN_WINDOW: usize = 8;

/// Scalar Kalman defaults
pub const DEFAULT_KALMAN_ERROR_ESTIMATE: f64 = 1.0;
pub const DEFAULT_KALMAN_ERROR_MEASURE: f64 = 1.0;
pub const DEFAULT_KALMAN_PROCESS_NOISE: f64 = 0.1;

/// Eye aspect ratio thresholds
pub const EAR_CLOSED_THRESHOLD: f64 = 0.15;
pub const EAR_OPEN_THRESHOLD: f64 = 0.2;
pub const EAR_WIDE_THRESHOLD: f64 = 0.35;

/// Minimum time between two clicks of the same button
pub const DEFAULT_CLICK_COOLDOWN_MS: u64 = 600;

/// Mouth openness scaling and drag threshold
pub const MOUTH_OPENNESS_SCALE: f64 = 150.0;
pub const MOUTH_OPEN_THRESHOLD: f64 = 15.0;

/// Output throttle defaults
pub const DEFAULT_MIN_SEND_INTERVAL_MS: u64 = 8;
pub const DEFAULT_JITTER_THRESHOLD_PX: f64 = 1.5;
pub const DEFAULT_FALLBACK_INTERVAL_MS: u64 = 100;

/// Calibration countdown defaults
pub const DEFAULT_COUNTDOWN_STEPS: u32 = 3;
pub const DEFAULT_COUNTDOWN_STEP_MS: u64 = 1000;

/// Numeric precision epsilon for ratio denominators
pub const EPSILON: f64 = 1e-6;
