use tracing::{debug, info, warn};

use crate::constants::window;
use crate::error::PetError;
use crate::lifecycle::Dispose;
use crate::types::{Dimensions, Position};

/// Platform window the geometry commands are issued against
pub trait WindowPlatform {
    /// Current top-left coordinate of the window
    fn outer_position(&self) -> Result<Position, PetError>;

    fn set_outer_position(&mut self, position: Position) -> Result<(), PetError>;

    fn set_inner_size(&mut self, size: Dimensions) -> Result<(), PetError>;

    /// Drop the window handle; later commands report `GeometryUnavailable`
    fn release(&mut self) -> Result<(), PetError>;
}

/// Resizes and moves the pet window between the fixed presets.
///
/// All commands are best-effort: a missing platform window is logged and
/// the command is skipped, so callers never have to handle a failure.
#[derive(Debug)]
pub struct WindowGeometryController<W> {
    platform: W,
    /// Captured before minimize/expand, consumed by the next restore
    saved_position: Option<Position>,
}

impl<W: WindowPlatform> WindowGeometryController<W> {
    pub fn new(platform: W) -> Self {
        Self {
            platform,
            saved_position: None,
        }
    }

    pub fn platform(&self) -> &W {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut W {
        &mut self.platform
    }

    pub fn saved_position(&self) -> Option<Position> {
        self.saved_position
    }

    /// Shrink to the icon preset in place
    pub fn minimize(&mut self) {
        let Some(position) = self.capture_position("minimize") else {
            return;
        };
        self.resize("minimize", window::MINIMIZED);
        self.reposition("minimize", position);
        info!(x = position.x, y = position.y, "Window minimized");
    }

    /// Grow to the menu preset, keeping the top-left corner
    pub fn expand(&mut self) {
        let Some(position) = self.capture_position("expand") else {
            return;
        };
        self.resize("expand", window::MENU_EXPANDED);
        self.reposition("expand", position);
        info!(x = position.x, y = position.y, "Window expanded for menu");
    }

    /// Back to the normal preset at the saved position
    pub fn restore(&mut self) {
        self.resize("restore", window::NORMAL);
        match self.saved_position.take() {
            Some(position) => {
                self.reposition("restore", position);
                info!(x = position.x, y = position.y, "Window restored");
            }
            None => debug!("Window restored without a saved position"),
        }
    }

    /// Shift the window by a drag delta
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        match self.platform.outer_position() {
            Ok(position) => self.reposition("move_by", position.offset(dx, dy)),
            Err(e) => warn!(error = %e, "Skipping window move"),
        }
    }

    fn capture_position(&mut self, command: &'static str) -> Option<Position> {
        match self.platform.outer_position() {
            Ok(position) => {
                self.saved_position = Some(position);
                Some(position)
            }
            Err(e) => {
                warn!(command, error = %e, "Skipping geometry command");
                None
            }
        }
    }

    fn resize(&mut self, command: &'static str, size: Dimensions) {
        if let Err(e) = self.platform.set_inner_size(size) {
            warn!(command, width = size.width, height = size.height, error = %e, "Failed to resize window");
        }
    }

    fn reposition(&mut self, command: &'static str, position: Position) {
        if let Err(e) = self.platform.set_outer_position(position) {
            warn!(command, x = position.x, y = position.y, error = %e, "Failed to move window");
        }
    }
}

impl<W: WindowPlatform> Dispose for WindowGeometryController<W> {
    fn name(&self) -> &'static str {
        "window geometry"
    }

    fn dispose(&mut self) -> Result<(), PetError> {
        self.saved_position = None;
        self.platform.release()
    }
}
