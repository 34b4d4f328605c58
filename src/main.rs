//! Face cursor: replay recorded facial landmark streams as cursor control.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use face_cursor::{
    config::{Config, EXAMPLE_CONFIG},
    replay::{open_output, parse_screen, read_frames, replay},
    tracker::FaceCursor,
};
use log::{info, warn};
use std::{fs::File, path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Stream a recorded landmark file through the cursor pipeline
    Replay {
        /// Recorded frames, one JSON object per line
        #[arg(short, long)]
        input: PathBuf,

        /// Path to configuration file (YAML format)
        #[arg(short = 'C', long)]
        config: Option<PathBuf>,

        /// Screen size as WIDTHxHEIGHT (defaults to the X11 screen, then 1920x1080)
        #[arg(short, long)]
        screen: Option<String>,

        /// Deliver commands to the X11 pointer instead of printing only
        #[arg(long)]
        x11: bool,

        /// Start calibration at this recording time in milliseconds
        #[arg(long, value_name = "MS")]
        calibrate_at_ms: Option<u64>,
    },
    /// Print an example configuration file
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    info!("Loading configuration from: {}", path.display());
    match Config::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config file: {}. Using defaults.", e);
            Config::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    match args.command {
        Command::Config => {
            print!("{EXAMPLE_CONFIG}");
            Ok(())
        }
        Command::Replay {
            input,
            config,
            screen,
            x11,
            calibrate_at_ms,
        } => {
            let config = load_config(config.as_ref());

            let screen = screen.as_deref().map(parse_screen).transpose()?;
            let (mut sink, screen) = open_output(x11, screen);

            let file = File::open(&input).with_context(|| format!("Failed to open {}", input.display()))?;
            let frames = read_frames(file)?;
            info!("Replaying {} frames from {}", frames.len(), input.display());

            let mut session = FaceCursor::new(config, screen)?;
            let summary = replay(
                &mut session,
                &frames,
                calibrate_at_ms.map(Duration::from_millis),
                sink.as_mut(),
                |now, command| println!("{:>10.1} {command}", now.as_secs_f64() * 1000.0),
            );

            info!(
                "Replayed {} frames ({} with a face), {} commands, {} clicks",
                summary.frames, summary.face_frames, summary.commands, summary.clicks
            );
            Ok(())
        }
    }
}
