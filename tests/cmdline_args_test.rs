//! Tests for command-line argument parsing
//!
//! Note: These tests verify the argument parser configuration by creating
//! a test parser with the same structure as the main application.

use clap::{Arg, ArgAction, Command as ClapCommand};
use face_cursor::replay::parse_screen;

/// Create a command with the same argument structure as the main binary
fn create_test_command() -> ClapCommand {
    ClapCommand::new("face-cursor")
        .version("0.1.0")
        .about("Facial landmark cursor control")
        .subcommand_required(true)
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug output"),
        )
        .subcommand(
            ClapCommand::new("replay")
                .about("Stream a recorded landmark file through the cursor pipeline")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("INPUT")
                        .required(true)
                        .help("Recorded frames"),
                )
                .arg(
                    Arg::new("config")
                        .short('C')
                        .long("config")
                        .value_name("CONFIG")
                        .help("Configuration file path"),
                )
                .arg(
                    Arg::new("screen")
                        .short('s')
                        .long("screen")
                        .value_name("SCREEN")
                        .help("Screen size"),
                )
                .arg(
                    Arg::new("x11")
                        .long("x11")
                        .action(ArgAction::SetTrue)
                        .help("Deliver commands to the X11 pointer"),
                )
                .arg(
                    Arg::new("calibrate-at-ms")
                        .long("calibrate-at-ms")
                        .value_name("MS")
                        .value_parser(clap::value_parser!(u64))
                        .help("Start calibration at this recording time"),
                ),
        )
        .subcommand(ClapCommand::new("config").about("Print an example configuration file"))
}

#[test]
fn test_help_argument() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["face-cursor", "--help"]);

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn test_subcommand_required() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["face-cursor"]);
    assert!(result.is_err());
}

#[test]
fn test_config_subcommand() {
    let cmd = create_test_command();
    let matches = cmd.try_get_matches_from(vec!["face-cursor", "config"]).unwrap();
    assert_eq!(matches.subcommand_name(), Some("config"));
}

#[test]
fn test_replay_requires_input() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["face-cursor", "replay"]);
    assert!(result.is_err());
}

#[test]
fn test_replay_defaults() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec!["face-cursor", "replay", "--input", "frames.jsonl"])
        .unwrap();
    let (name, replay) = matches.subcommand().unwrap();
    assert_eq!(name, "replay");
    assert_eq!(replay.get_one::<String>("input").map(|s| s.as_str()), Some("frames.jsonl"));
    assert!(!replay.get_flag("x11"));
    assert!(replay.get_one::<String>("screen").is_none());
    assert!(replay.get_one::<u64>("calibrate-at-ms").is_none());
}

#[test]
fn test_replay_all_arguments() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec![
            "face-cursor",
            "replay",
            "-i",
            "frames.jsonl",
            "-C",
            "config.yaml",
            "--screen",
            "2560x1440",
            "--x11",
            "--calibrate-at-ms",
            "500",
            "--debug",
        ])
        .unwrap();
    assert!(matches.get_flag("debug"));
    let replay = matches.subcommand_matches("replay").unwrap();
    assert_eq!(replay.get_one::<String>("config").map(|s| s.as_str()), Some("config.yaml"));
    assert!(replay.get_flag("x11"));
    assert_eq!(replay.get_one::<u64>("calibrate-at-ms"), Some(&500));

    let screen = parse_screen(replay.get_one::<String>("screen").unwrap()).unwrap();
    assert_eq!((screen.width, screen.height), (2560, 1440));
}

#[test]
fn test_invalid_calibration_time() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec![
        "face-cursor",
        "replay",
        "--input",
        "frames.jsonl",
        "--calibrate-at-ms",
        "soon",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_invalid_screen_values() {
    for value in ["", "1920", "x1080", "1920x", "-1x100", "1920x1080x2"] {
        assert!(parse_screen(value).is_err(), "should reject screen '{value}'");
    }
}
