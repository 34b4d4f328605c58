//! Cursor control for X11-based systems.
//!
//! [`X11MouseSink`] delivers pipeline commands to the X server: moves through
//! `WarpPointer`, presses and releases through the XTEST extension. A sink
//! that failed to connect stays disconnected, so dispatch skips it silently.

use crate::{
    dispatch::{MouseButton, MouseCommand, MouseSink},
    error::{Error, Result},
    mapping::{ScreenGeometry, ScreenSize},
};
use log::{debug, info, warn};
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{ConnectionExt as _, Screen, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT},
        xtest::ConnectionExt as _,
    },
    rust_connection::RustConnection,
};

const BUTTON_LEFT: u8 = 1;
const BUTTON_RIGHT: u8 = 3;

struct X11Session {
    connection: RustConnection,
    screen: Screen,
}

/// Mouse sink backed by an X11 connection
pub struct X11MouseSink {
    session: Option<X11Session>,
}

impl X11MouseSink {
    /// Connect to the display named by `$DISPLAY`
    pub fn new() -> Result<Self> {
        info!("Initializing X11 cursor controller");

        let (connection, screen_num) = RustConnection::connect(None)
            .map_err(|e| Error::X11(format!("Failed to connect to X11: {e}")))?;

        let screen = connection
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| Error::X11("Failed to get screen".to_string()))?
            .clone();

        info!(
            "Connected to X11 display, screen: {}x{}",
            screen.width_in_pixels, screen.height_in_pixels
        );

        Ok(Self {
            session: Some(X11Session { connection, screen }),
        })
    }

    /// Connect, or fall back to a disconnected sink
    #[must_use]
    pub fn connect_or_disconnected() -> Self {
        Self::new().unwrap_or_else(|e| {
            warn!("Cursor control unavailable: {e}");
            Self { session: None }
        })
    }

    fn session(&self) -> Result<&X11Session> {
        self.session
            .as_ref()
            .ok_or_else(|| Error::CursorControl("X11 sink is disconnected".to_string()))
    }

    fn warp(&self, x: i32, y: i32) -> Result<()> {
        let session = self.session()?;
        let max_x = i16::try_from(session.screen.width_in_pixels.saturating_sub(1)).unwrap_or(i16::MAX);
        let max_y = i16::try_from(session.screen.height_in_pixels.saturating_sub(1)).unwrap_or(i16::MAX);
        let x = i16::try_from(x.clamp(0, i32::from(max_x))).unwrap_or(max_x);
        let y = i16::try_from(y.clamp(0, i32::from(max_y))).unwrap_or(max_y);

        debug!("Setting cursor position to ({}, {})", x, y);

        session
            .connection
            .warp_pointer(x11rb::NONE, session.screen.root, 0, 0, 0, 0, x, y)
            .map_err(|e| Error::CursorControl(format!("Failed to warp pointer: {e}")))?;
        Ok(())
    }

    fn fake_button(&self, event: u8, button: u8) -> Result<()> {
        let session = self.session()?;
        session
            .connection
            .xtest_fake_input(event, button, x11rb::CURRENT_TIME, session.screen.root, 0, 0, 0)
            .map_err(|e| Error::CursorControl(format!("Failed to fake button input: {e}")))?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.session()?
            .connection
            .flush()
            .map_err(|e| Error::CursorControl(format!("Failed to flush connection: {e}")))
    }
}

const fn button_code(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => BUTTON_LEFT,
        MouseButton::Right => BUTTON_RIGHT,
    }
}

impl MouseSink for X11MouseSink {
    fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn send(&mut self, command: MouseCommand) -> Result<()> {
        match command {
            MouseCommand::MoveTo { x, y } => self.warp(x, y)?,
            MouseCommand::Click(button) => {
                self.fake_button(BUTTON_PRESS_EVENT, button_code(button))?;
                self.fake_button(BUTTON_RELEASE_EVENT, button_code(button))?;
            }
            MouseCommand::MouseDown => self.fake_button(BUTTON_PRESS_EVENT, BUTTON_LEFT)?,
            MouseCommand::MouseUp => self.fake_button(BUTTON_RELEASE_EVENT, BUTTON_LEFT)?,
        }
        self.flush()
    }
}

impl ScreenGeometry for X11MouseSink {
    fn screen_size(&self) -> Option<ScreenSize> {
        self.session.as_ref().map(|session| {
            ScreenSize::new(
                u32::from(session.screen.width_in_pixels),
                u32::from(session.screen.height_in_pixels),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires X11 display
    fn test_x11_sink_creation() {
        let sink = X11MouseSink::new().unwrap();
        assert!(sink.is_connected());
        assert!(sink.screen_size().is_some());
    }

    #[test]
    fn test_disconnected_sink() {
        let mut sink = X11MouseSink { session: None };
        assert!(!sink.is_connected());
        assert!(sink.screen_size().is_none());
        assert!(sink.send(MouseCommand::MouseDown).is_err());
    }

    #[test]
    fn test_button_codes() {
        assert_eq!(button_code(MouseButton::Left), 1);
        assert_eq!(button_code(MouseButton::Right), 3);
    }
}
