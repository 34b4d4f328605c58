//! Tracking session context.
//!
//! [`FaceCursor`] owns every piece of per-session state: the smoothing
//! pipeline, the calibration reference, the gesture detectors and the output
//! throttle. Hosts feed it one landmark frame at a time; each call runs the
//! whole pass (mapping, smoothing, gestures, throttling) to completion and
//! returns the commands to dispatch. A fresh session is a fresh value.

use crate::{
    calibration::{Calibration, CalibrationPhase},
    config::{Config, SmoothingConfig},
    dispatch::{dispatch, MouseCommand, MouseSink, OutputThrottle},
    error::{Error, Result},
    gestures::{GestureDetector, GestureEvent, GestureReport},
    landmarks::{FaceLandmarks, LandmarkFrame, LandmarkSchema},
    mapping::{CursorMapper, ScreenSize},
    smoothing::{SmootherParams, SmoothingPipeline},
};
use log::{debug, info};
use std::time::Duration;

/// Coarse tracking state for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// The latest frame had no usable face
    NoFace,
    /// Face visible, no calibration reference yet
    Uncalibrated,
    /// Calibration countdown running
    Calibrating { remaining: u32 },
    /// Calibrated and driving the cursor
    Tracking,
}

/// Snapshot of the session for status display
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub tracking: TrackingState,
    /// Latest smoothed cursor position
    pub cursor: Option<(i32, i32)>,
    pub eye_label: &'static str,
    pub mouth_label: &'static str,
    pub click_count: u64,
    pub wide_open: bool,
    pub mouth_openness: f64,
    pub show_mesh: bool,
}

/// Result of one pipeline pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    /// Smoothed cursor position computed this frame, whether or not it was sent
    pub cursor: Option<(i32, i32)>,
    /// Commands to hand to the mouse sink, in order
    pub commands: Vec<MouseCommand>,
    pub events: Vec<GestureEvent>,
}

/// Per-session face-to-cursor context
#[derive(Debug, Clone)]
pub struct FaceCursor {
    config: Config,
    schema: LandmarkSchema,
    mapper: CursorMapper,
    pipeline: SmoothingPipeline,
    calibration: Calibration,
    gestures: GestureDetector,
    throttle: OutputThrottle,
    face_present: bool,
    last_report: Option<GestureReport>,
    cursor: Option<(i32, i32)>,
    show_mesh: bool,
    last_time: Duration,
}

impl FaceCursor {
    /// Create a session for `screen`, validating `config` first
    pub fn new(config: Config, screen: ScreenSize) -> Result<Self> {
        config.validate()?;
        info!(
            "Starting face cursor session on {}x{} screen",
            screen.width, screen.height
        );

        Ok(Self {
            schema: config.landmarks.clone(),
            mapper: CursorMapper::new(&config, screen),
            pipeline: SmoothingPipeline::new(SmootherParams::from(&config.smoothing)),
            calibration: Calibration::new(&config.calibration),
            gestures: GestureDetector::new(&config.gestures),
            throttle: OutputThrottle::new(&config.output),
            face_present: false,
            last_report: None,
            cursor: None,
            show_mesh: config.display.show_mesh,
            last_time: Duration::ZERO,
            config,
        })
    }

    /// Run one full pass over `frame`, captured at `now` since session start.
    ///
    /// A missing frame, or one without the schema's landmarks, leaves every
    /// filter untouched and produces no commands.
    pub fn process(&mut self, frame: Option<&LandmarkFrame>, now: Duration) -> FrameOutput {
        self.last_time = now;

        let Some(face) = frame.and_then(|f| self.schema.extract(f)) else {
            if self.face_present {
                debug!("Face lost");
            }
            self.face_present = false;
            return FrameOutput::default();
        };
        self.face_present = true;

        if self.calibration.advance(now, Some(face.nose)).is_some() {
            self.recenter();
        }

        let report = self.gestures.update(&face, now);
        let mut output = FrameOutput {
            events: report.events.clone(),
            ..FrameOutput::default()
        };

        if let Some(position) = self.track(&face, report.mouth_openness, now) {
            output.cursor = Some(position);
            if self.throttle.should_send(position, now) {
                output.commands.push(MouseCommand::MoveTo {
                    x: position.0,
                    y: position.1,
                });
            }
        }

        output.commands.extend(report.events.iter().map(|event| match *event {
            GestureEvent::Click(button) => MouseCommand::Click(button),
            GestureEvent::DragStart => MouseCommand::MouseDown,
            GestureEvent::DragEnd => MouseCommand::MouseUp,
        }));

        self.last_report = Some(report);
        output
    }

    fn track(&mut self, face: &FaceLandmarks, mouth_openness: f64, now: Duration) -> Option<(i32, i32)> {
        let reference = self.calibration.reference()?;
        let target = self.mapper.map(face.nose, reference, mouth_openness);
        let position = self.pipeline.update(target, now);
        self.cursor = Some(position);
        Some(position)
    }

    /// Process `frame` and deliver the resulting commands to `sink`
    pub fn on_landmark_frame(
        &mut self,
        frame: Option<&LandmarkFrame>,
        now: Duration,
        sink: &mut dyn MouseSink,
    ) -> FrameOutput {
        let output = self.process(frame, now);
        dispatch(sink, &output.commands);
        output
    }

    /// Start the calibration countdown.
    ///
    /// Rejected when the latest frame had no face.
    pub fn calibrate(&mut self, now: Duration) -> Result<()> {
        if !self.face_present {
            return Err(Error::Calibration("No face detected, cannot calibrate".to_string()));
        }
        self.calibration.start(now);
        Ok(())
    }

    /// Capture the nose in `frame` as the reference without a countdown
    pub fn calibrate_now(&mut self, frame: &LandmarkFrame) -> Result<()> {
        let face = self
            .schema
            .extract(frame)
            .ok_or_else(|| Error::Calibration("No face in frame, cannot calibrate".to_string()))?;
        self.calibration.capture(face.nose);
        self.recenter();
        Ok(())
    }

    fn recenter(&mut self) {
        self.pipeline.reset_to(self.mapper.screen().center());
        self.throttle.reset();
        self.cursor = None;
    }

    /// End the session: forget calibration and clear all filter and gesture state.
    ///
    /// Returns a `MouseUp` when a drag was held, so the button is never left pressed.
    pub fn stop(&mut self) -> Option<MouseCommand> {
        let release = self.reset();
        self.calibration.clear();
        self.pipeline.reset();
        self.face_present = false;
        info!("Tracking stopped");
        release
    }

    /// [`stop`](Self::stop) and deliver the drag release, if any
    pub fn on_stop(&mut self, sink: &mut dyn MouseSink) {
        if let Some(command) = self.stop() {
            dispatch(sink, &[command]);
        }
    }

    /// Clear filter, gesture and throttle state, keeping the calibration
    /// reference. Returns a `MouseUp` when a drag was held.
    pub fn reset(&mut self) -> Option<MouseCommand> {
        let was_dragging = self.gestures.reset();
        if self.calibration.is_calibrated() {
            self.recenter();
        } else {
            self.pipeline.reset();
            self.throttle.reset();
            self.cursor = None;
        }
        self.last_report = None;
        debug!("Pipeline state reset");
        was_dragging.then_some(MouseCommand::MouseUp)
    }

    /// Change the sensitivity multiplier
    pub fn set_sensitivity(&mut self, sensitivity: f64) -> Result<()> {
        if !(sensitivity > 0.0 && sensitivity <= 10.0) {
            return Err(Error::InvalidInput(format!(
                "Sensitivity must be in (0, 10], got {sensitivity}"
            )));
        }
        self.config.cursor.sensitivity = sensitivity;
        self.mapper.set_sensitivity(sensitivity);
        Ok(())
    }

    /// Change the smoothness slider (0-1); takes effect on the next frame
    pub fn set_smoothness(&mut self, slider: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&slider) {
            return Err(Error::InvalidInput(format!(
                "Smoothness must be between 0.0 and 1.0, got {slider}"
            )));
        }
        self.config.smoothing.smoothness = slider;
        self.pipeline.set_base_factor(SmoothingConfig::base_factor_for(slider));
        Ok(())
    }

    /// Cosmetic only
    pub fn set_mesh_visible(&mut self, visible: bool) {
        self.show_mesh = visible;
        self.config.display.show_mesh = visible;
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn screen(&self) -> ScreenSize {
        self.mapper.screen()
    }

    #[must_use]
    pub const fn is_calibrated(&self) -> bool {
        self.calibration.is_calibrated()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }

    /// Current status as of the latest frame
    #[must_use]
    pub fn status(&self) -> Status {
        let tracking = if self.face_present {
            match self.calibration.phase(self.last_time) {
                CalibrationPhase::Countdown { remaining } => TrackingState::Calibrating { remaining },
                CalibrationPhase::Calibrated => TrackingState::Tracking,
                CalibrationPhase::Uncalibrated => TrackingState::Uncalibrated,
            }
        } else {
            TrackingState::NoFace
        };

        let report = self.last_report.as_ref().filter(|_| self.face_present);
        Status {
            tracking,
            cursor: self.cursor,
            eye_label: match report {
                Some(report) => report.eye_label(),
                None if self.face_present => "Eyes open",
                None => "No face",
            },
            mouth_label: match report {
                Some(report) => report.mouth_label(),
                None if self.face_present => "Mouth closed",
                None => "No face",
            },
            click_count: self.gestures.click_count(),
            wide_open: report.is_some_and(|r| r.eyes.wide_open),
            mouth_openness: report.map_or(0.0, |r| r.mouth_openness),
            show_mesh: self.show_mesh,
        }
    }
}
