//! Output dispatch to the mouse-control sink.
//!
//! Move commands pass through [`OutputThrottle`], which caps the send rate
//! and drops sub-threshold jitter, re-sending the resting position only after
//! a longer fallback interval. Dispatch is fire-and-forget: a disconnected
//! sink or a failing send drops the command without surfacing an error.

use crate::{config::OutputConfig, Result};
use log::{debug, warn};
use std::{fmt, time::Duration};

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// Command accepted by a [`MouseSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseCommand {
    MoveTo { x: i32, y: i32 },
    Click(MouseButton),
    MouseDown,
    MouseUp,
}

impl fmt::Display for MouseCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo { x, y } => write!(f, "move {x} {y}"),
            Self::Click(MouseButton::Left) => write!(f, "click left"),
            Self::Click(MouseButton::Right) => write!(f, "click right"),
            Self::MouseDown => write!(f, "down"),
            Self::MouseUp => write!(f, "up"),
        }
    }
}

/// External mouse-control collaborator
pub trait MouseSink {
    /// Whether commands can currently be delivered
    fn is_connected(&self) -> bool {
        true
    }

    /// Deliver one command
    fn send(&mut self, command: MouseCommand) -> Result<()>;
}

/// Sink that is never connected
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MouseSink for NullSink {
    fn is_connected(&self) -> bool {
        false
    }

    fn send(&mut self, _command: MouseCommand) -> Result<()> {
        Ok(())
    }
}

/// Sink that records every delivered command
#[derive(Debug, Clone)]
pub struct MemorySink {
    pub commands: Vec<MouseCommand>,
    pub connected: bool,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            connected: true,
        }
    }
}

impl MemorySink {
    /// Delivered move targets, in order
    #[must_use]
    pub fn moves(&self) -> Vec<(i32, i32)> {
        self.commands
            .iter()
            .filter_map(|c| match *c {
                MouseCommand::MoveTo { x, y } => Some((x, y)),
                _ => None,
            })
            .collect()
    }
}

impl MouseSink for MemorySink {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn send(&mut self, command: MouseCommand) -> Result<()> {
        self.commands.push(command);
        Ok(())
    }
}

/// Deliver commands in order, skipping silently when the sink is unavailable.
///
/// Returns the number of commands delivered.
pub fn dispatch(sink: &mut dyn MouseSink, commands: &[MouseCommand]) -> usize {
    if commands.is_empty() {
        return 0;
    }
    if !sink.is_connected() {
        debug!("Mouse sink disconnected, dropping {} command(s)", commands.len());
        return 0;
    }

    let mut delivered = 0;
    for &command in commands {
        match sink.send(command) {
            Ok(()) => delivered += 1,
            Err(e) => warn!("Dropping '{command}': {e}"),
        }
    }
    delivered
}

/// Rate and jitter limiter for move commands
#[derive(Debug, Clone)]
pub struct OutputThrottle {
    min_interval: Duration,
    fallback_interval: Duration,
    jitter_threshold: f64,
    last_sent: Option<((i32, i32), Duration)>,
}

impl OutputThrottle {
    #[must_use]
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            min_interval: config.min_interval(),
            fallback_interval: config.fallback_interval(),
            jitter_threshold: config.jitter_threshold_px,
            last_sent: None,
        }
    }

    /// Decide whether `position` is worth sending at `now`; records it when it is
    pub fn should_send(&mut self, position: (i32, i32), now: Duration) -> bool {
        let send = match self.last_sent {
            None => true,
            Some((last, at)) => {
                let elapsed = now.saturating_sub(at);
                if elapsed < self.min_interval {
                    false
                } else {
                    let dx = f64::from(position.0) - f64::from(last.0);
                    let dy = f64::from(position.1) - f64::from(last.1);
                    dx.hypot(dy) > self.jitter_threshold || elapsed >= self.fallback_interval
                }
            }
        };

        if send {
            self.last_sent = Some((position, now));
        }
        send
    }

    /// Last position handed out for sending
    #[must_use]
    pub fn last_sent(&self) -> Option<(i32, i32)> {
        self.last_sent.map(|(position, _)| position)
    }

    pub fn reset(&mut self) {
        self.last_sent = None;
    }
}
