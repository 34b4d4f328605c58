//! End-to-end tests of the mapping and smoothing path


use face_cursor::{
    config::SmoothingConfig,
    dispatch::{MemorySink, MouseCommand},
    smoothing::{SmootherParams, SmoothingPipeline},
    TrackingState,
};
use std::time::Duration;
use test_helpers::{face_at, frame_time, session};

const CENTER: (i32, i32) = (960, 540);

#[test]
fn test_calibration_settles_at_center() {
    let mut s = session();
    let reference = face_at(0.47, 0.52);
    s.calibrate_now(&reference).unwrap();

    let mut sink = MemorySink::default();
    for i in 0..120 {
        let out = s.on_landmark_frame(Some(&reference), frame_time(i), &mut sink);
        assert_eq!(out.cursor, Some(CENTER), "frame {i}");
    }
    assert!(!sink.moves().is_empty());
    assert!(sink.moves().iter().all(|&p| p == CENTER));
    assert_eq!(s.status().tracking, TrackingState::Tracking);
}

#[test]
fn test_held_offset_converges_to_mapped_target() {
    let mut s = session();
    s.calibrate_now(&face_at(0.5, 0.5)).unwrap();

    // 0.05 left of reference: 0.04 past the dead zone, 0.04 * 1080 * 2.5 = 108,
    // times the 16:9 over 4:3 compensation = 144, mirrored to the right
    let held = face_at(0.45, 0.5);
    let mut last = None;
    for i in 0..600 {
        last = s.process(Some(&held), frame_time(i)).cursor;
    }
    let (x, y) = last.unwrap();
    assert!((x - 1104).abs() <= 2, "x = {x}");
    assert!((y - 540).abs() <= 2, "y = {y}");
}

#[test]
fn test_cursor_moves_gradually() {
    let mut s = session();
    s.calibrate_now(&face_at(0.5, 0.5)).unwrap();

    let held = face_at(0.45, 0.5);
    let first = s.process(Some(&held), frame_time(0)).cursor.unwrap();
    // no snap to the target on the first frame after a step
    assert!(first.0 < 1000, "jumped to {first:?}");

    let mut previous = first.0;
    for i in 1..60 {
        let x = s.process(Some(&held), frame_time(i)).cursor.unwrap().0;
        assert!(x <= 1106, "overshoot to {x}");
        assert!(x + 2 >= previous, "moved back from {previous} to {x}");
        previous = x;
    }
    assert!(previous > first.0);
}

#[test]
fn test_single_frame_spike_is_rejected() {
    let mut s = session();
    let rest = face_at(0.5, 0.5);
    s.calibrate_now(&rest).unwrap();
    for i in 0..10 {
        s.process(Some(&rest), frame_time(i));
    }

    let spike = s.process(Some(&face_at(0.0, 1.0)), frame_time(10));
    assert_eq!(spike.cursor, Some(CENTER));
    let after = s.process(Some(&rest), frame_time(11));
    assert_eq!(after.cursor, Some(CENTER));
}

#[test]
fn test_missing_face_frames_are_skipped() {
    let mut s = session();
    let rest = face_at(0.5, 0.5);
    s.calibrate_now(&rest).unwrap();
    s.process(Some(&rest), frame_time(0));

    for i in 1..10 {
        let out = s.process(None, frame_time(i));
        assert_eq!(out.cursor, None);
        assert!(out.commands.is_empty());
    }
    assert_eq!(s.status().tracking, TrackingState::NoFace);
    // the last good position is still reported
    assert_eq!(s.status().cursor, Some(CENTER));

    let resumed = s.process(Some(&rest), frame_time(10));
    assert_eq!(resumed.cursor, Some(CENTER));
}

#[test]
fn test_short_frames_count_as_no_face() {
    let mut s = session();
    s.calibrate_now(&face_at(0.5, 0.5)).unwrap();
    let truncated = face_cursor::landmarks::LandmarkFrame::from_xy(&[(0.5, 0.5); 10]);
    let out = s.process(Some(&truncated), frame_time(0));
    assert_eq!(out.cursor, None);
    assert_eq!(s.status().tracking, TrackingState::NoFace);
}

#[test]
fn test_new_session_after_stop_starts_clean() {
    let mut s = session();
    s.calibrate_now(&face_at(0.5, 0.5)).unwrap();
    for i in 0..30 {
        s.process(Some(&face_at(0.4, 0.6)), frame_time(i));
    }
    assert_eq!(s.stop(), None);
    assert_eq!(s.process(Some(&face_at(0.4, 0.6)), frame_time(30)).cursor, None);

    let reference = face_at(0.3, 0.3);
    s.calibrate_now(&reference).unwrap();
    let out = s.process(Some(&reference), frame_time(31));
    assert_eq!(out.cursor, Some(CENTER));
    assert_eq!(out.commands, vec![MouseCommand::MoveTo { x: 960, y: 540 }]);
}

#[test]
fn test_sensitivity_scales_travel() {
    let run = |sensitivity: f64| {
        let mut s = session();
        s.set_sensitivity(sensitivity).unwrap();
        s.calibrate_now(&face_at(0.5, 0.5)).unwrap();
        let held = face_at(0.5, 0.55);
        let mut y = 0;
        for i in 0..600 {
            y = s.process(Some(&held), frame_time(i)).cursor.unwrap().1;
        }
        y - 540
    };
    let normal = run(1.0);
    let double = run(2.0);
    // 0.04 * 1080 * 2.5 = 108
    assert!((normal - 108).abs() <= 2, "normal = {normal}");
    assert!((double - 216).abs() <= 2, "double = {double}");
}

#[test]
fn test_fast_motion_raises_adaptive_factor() {
    let config = SmoothingConfig::default();
    let mut pipeline = SmoothingPipeline::new(SmootherParams::from(&config));
    pipeline.reset_to(CENTER_F);
    let base = pipeline.adaptive_factor();
    assert!((base - config.base_factor()).abs() < 1e-12);

    for i in 1..=8u32 {
        let x = 960.0 + f64::from(i) * 40.0;
        pipeline.update((x, 540.0), Duration::from_millis(u64::from(i) * 16));
    }
    let (vx, vy) = pipeline.velocity();
    assert!(vx > 0.0);
    assert_eq!(vy, 0.0);
    assert!(pipeline.adaptive_factor() > base);
    assert!(pipeline.adaptive_factor() <= config.max_factor);
}

const CENTER_F: (f64, f64) = (960.0, 540.0);
