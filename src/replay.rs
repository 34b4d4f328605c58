//! Replay of recorded landmark streams.
//!
//! A recording is JSON Lines, one frame per line:
//! `{"t_ms": 33.3, "points": [[0.5, 0.5], ...]}` with `points` set to `null`
//! for frames where the landmark source found no face. Blank lines are
//! skipped. Timestamps are milliseconds since the start of the recording.

use crate::{
    cursor_control::X11MouseSink,
    dispatch::{dispatch, MouseCommand, MouseSink, NullSink},
    error::{Error, Result},
    landmarks::LandmarkFrame,
    mapping::{resolve_screen, ScreenGeometry, ScreenSize},
    tracker::FaceCursor,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    io::{BufRead, BufReader, Read},
    time::Duration,
};

/// One recorded frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub t_ms: f64,
    pub points: Option<Vec<[f64; 2]>>,
}

impl RecordedFrame {
    /// Timestamp as a duration; negative or non-finite stamps clamp to zero,
    /// stamps past [`Duration::MAX`] saturate
    #[must_use]
    pub fn timestamp(&self) -> Duration {
        if self.t_ms.is_finite() && self.t_ms > 0.0 {
            Duration::try_from_secs_f64(self.t_ms / 1000.0).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }

    #[must_use]
    pub fn landmarks(&self) -> Option<LandmarkFrame> {
        self.points.as_ref().map(|points| {
            let xy: Vec<(f64, f64)> = points.iter().map(|&[x, y]| (x, y)).collect();
            LandmarkFrame::from_xy(&xy)
        })
    }
}

/// Parse a JSON Lines recording
pub fn read_frames<R: Read>(reader: R) -> Result<Vec<RecordedFrame>> {
    let mut frames = Vec::new();
    for (number, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let frame: RecordedFrame = serde_json::from_str(line)
            .map_err(|e| Error::Parse(format!("line {}: {e}", number + 1)))?;
        if Duration::try_from_secs_f64(frame.t_ms.max(0.0) / 1000.0).is_err() {
            return Err(Error::Parse(format!(
                "line {}: timestamp {} ms is out of range",
                number + 1,
                frame.t_ms
            )));
        }
        frames.push(frame);
    }
    debug!("Read {} recorded frames", frames.len());
    Ok(frames)
}

/// Parse a `WIDTHxHEIGHT` screen size such as `1920x1080`
pub fn parse_screen(value: &str) -> Result<ScreenSize> {
    let invalid = || Error::InvalidInput(format!("Invalid screen size '{value}', expected WIDTHxHEIGHT"));
    let (width, height) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: u32 = width.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok(ScreenSize::new(width, height))
}

/// Pick the command sink and screen size for a replay run.
///
/// With `use_x11` a single X11 connection drives the pointer and, unless
/// `screen` is given, supplies the screen size. Without it commands are
/// dropped after being reported and nothing is buffered.
#[must_use]
pub fn open_output(use_x11: bool, screen: Option<ScreenSize>) -> (Box<dyn MouseSink>, ScreenSize) {
    if use_x11 {
        let sink = X11MouseSink::connect_or_disconnected();
        let screen = screen.unwrap_or_else(|| resolve_screen(Some(&sink as &dyn ScreenGeometry)));
        (Box::new(sink), screen)
    } else {
        (Box::new(NullSink), screen.unwrap_or_else(|| resolve_screen(None)))
    }
}

/// Replay counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub frames: usize,
    pub face_frames: usize,
    pub commands: usize,
    pub clicks: u64,
}

/// Drive `session` with `frames`, dispatching every command to `sink`.
///
/// When `calibrate_at` is set the countdown is started on the first face
/// frame at or after that time. `on_command` sees each command as emitted.
pub fn replay(
    session: &mut FaceCursor,
    frames: &[RecordedFrame],
    calibrate_at: Option<Duration>,
    sink: &mut dyn MouseSink,
    mut on_command: impl FnMut(Duration, &MouseCommand),
) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    let mut pending_calibration = calibrate_at;

    for recorded in frames {
        let now = recorded.timestamp();
        let frame = recorded.landmarks();
        let output = session.on_landmark_frame(frame.as_ref(), now, sink);

        summary.frames += 1;
        if frame.is_some() {
            summary.face_frames += 1;
        }
        summary.commands += output.commands.len();
        for command in &output.commands {
            on_command(now, command);
        }

        if let Some(at) = pending_calibration.filter(|&at| now >= at) {
            match session.calibrate(now) {
                Ok(()) => {
                    info!("Calibration requested at {:.0} ms", at.as_secs_f64() * 1000.0);
                    pending_calibration = None;
                }
                Err(e) => debug!("Deferring calibration: {e}"),
            }
        }
    }

    summary.clicks = session.status().click_count;
    if let Some(command) = session.stop() {
        on_command(frames.last().map_or(Duration::ZERO, RecordedFrame::timestamp), &command);
        summary.commands += 1;
        dispatch(sink, &[command]);
    }
    if pending_calibration.is_some() {
        warn!("Recording ended before calibration could start");
    }

    summary
}
