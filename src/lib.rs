//! Face cursor library: real-time facial landmarks to smoothed cursor control.
//!
//! The library turns a stream of normalized facial landmark frames into
//! mouse commands:
//! - the nose offset from a calibrated reference drives the cursor
//! - a left or right wink clicks
//! - an open mouth holds the left button for dragging
//!
//! The cursor path runs through a four-layer per-axis smoother:
//! 1. Median filter to reject landmark spikes
//! 2. Scalar Kalman estimate
//! 3. Velocity-adaptive exponential smoothing
//! 4. Bezier easing toward the smoothed target
//!
//! Camera capture and face-mesh inference are external; a host supplies
//! landmark frames and a [`dispatch::MouseSink`] to receive commands.
//!
//! # Examples
//!
//! ## Driving a session
//!
//! ```
//! use face_cursor::{
//!     config::Config,
//!     dispatch::MemorySink,
//!     landmarks::{LandmarkFrame, LandmarkSchema},
//!     mapping::ScreenSize,
//!     tracker::FaceCursor,
//! };
//! use std::time::Duration;
//!
//! # fn main() -> face_cursor::Result<()> {
//! let mut session = FaceCursor::new(Config::default(), ScreenSize::new(1920, 1080))?;
//! let mut sink = MemorySink::default();
//!
//! // A frame from the landmark source; every point at the image centre
//! let points = vec![(0.5, 0.5); LandmarkSchema::default().required_len()];
//! let frame = LandmarkFrame::from_xy(&points);
//!
//! session.calibrate_now(&frame)?;
//! session.on_landmark_frame(Some(&frame), Duration::from_millis(0), &mut sink);
//!
//! // Head at the reference: the cursor rests at screen centre
//! assert_eq!(sink.moves(), vec![(960, 540)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the filters directly
//!
//! ```
//! use face_cursor::filters::{kalman::{KalmanParams, ScalarKalman}, median::MedianFilter};
//!
//! let mut median = MedianFilter::new(8);
//! for value in [1.0, 50.0, 2.0] {
//!     median.push(value);
//! }
//! assert_eq!(median.median(), Some(2.0));
//!
//! let mut kalman = ScalarKalman::new(KalmanParams::default());
//! // the first measurement seeds the estimate
//! assert_eq!(kalman.update(42.0), 42.0);
//! ```

/// Signal filters used by the smoothing pipeline
pub mod filters;

/// Four-layer per-axis cursor smoothing
pub mod smoothing;

/// Landmark frames and the anatomical index schema
pub mod landmarks;

/// Head offset to screen coordinate mapping
pub mod mapping;

/// Calibration countdown and reference capture
pub mod calibration;

/// Wink and mouth gesture detection
pub mod gestures;

/// Mouse commands, sinks and the output throttle
pub mod dispatch;

/// Per-session tracking context
pub mod tracker;

/// Recorded landmark stream replay
pub mod replay;

/// Cursor control module for X11 systems
pub mod cursor_control;

/// Utility functions for numeric conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
pub use tracker::{FaceCursor, FrameOutput, Status, TrackingState};
