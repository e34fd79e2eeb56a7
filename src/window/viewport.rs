use egui::{Context, ViewportCommand};
use tracing::debug;

use crate::error::PetError;
use crate::types::{Dimensions, Position};
use crate::window::WindowPlatform;

/// Frames to trust our own position over the OS report after a move.
/// Viewport commands are applied asynchronously, so the reported rect lags.
const SETTLE_FRAMES: u8 = 3;

/// `WindowPlatform` backed by the eframe root viewport
#[derive(Debug, Default)]
pub struct ViewportWindow {
    ctx: Option<Context>,
    position: Option<Position>,
    settling: u8,
}

impl ViewportWindow {
    /// Seed the position with where the window was asked to open
    pub fn new(initial: Position) -> Self {
        Self {
            ctx: None,
            position: Some(initial),
            settling: 0,
        }
    }

    /// Called once per frame, before input is processed
    pub fn sync(&mut self, ctx: &Context) {
        if self.ctx.is_none() {
            debug!("Viewport attached");
            self.ctx = Some(ctx.clone());
        }

        if self.settling > 0 {
            self.settling -= 1;
            return;
        }

        if let Some(rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.position = Some(rect.min.into());
        }
    }

    fn context(&self, command: &'static str) -> Result<&Context, PetError> {
        self.ctx.as_ref().ok_or(PetError::GeometryUnavailable(command))
    }
}

impl WindowPlatform for ViewportWindow {
    fn outer_position(&self) -> Result<Position, PetError> {
        self.context("outer_position")?;
        self.position
            .ok_or(PetError::GeometryUnavailable("outer_position"))
    }

    fn set_outer_position(&mut self, position: Position) -> Result<(), PetError> {
        self.context("set_outer_position")?
            .send_viewport_cmd(ViewportCommand::OuterPosition(position.into()));
        self.position = Some(position);
        self.settling = SETTLE_FRAMES;
        Ok(())
    }

    fn set_inner_size(&mut self, size: Dimensions) -> Result<(), PetError> {
        self.context("set_inner_size")?
            .send_viewport_cmd(ViewportCommand::InnerSize(size.into()));
        Ok(())
    }

    fn release(&mut self) -> Result<(), PetError> {
        self.ctx
            .take()
            .map(|_| debug!("Viewport detached"))
            .ok_or(PetError::GeometryUnavailable("release"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unattached_viewport_reports_unavailable() {
        let mut window = ViewportWindow::new(Position::new(0.0, 50.0));

        assert_eq!(
            window.outer_position(),
            Err(PetError::GeometryUnavailable("outer_position"))
        );
        assert!(window.set_inner_size(Dimensions::new(10.0, 10.0)).is_err());
        assert!(window.set_outer_position(Position::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn test_attached_viewport_tracks_commanded_position() {
        let ctx = Context::default();
        let mut window = ViewportWindow::new(Position::new(0.0, 50.0));
        window.sync(&ctx);

        window.set_outer_position(Position::new(40.0, 60.0)).unwrap();
        // The next sync must not overwrite the commanded position with a stale report
        window.sync(&ctx);
        assert_eq!(window.outer_position(), Ok(Position::new(40.0, 60.0)));

        window.release().unwrap();
        assert!(window.outer_position().is_err());
        assert!(window.release().is_err());
    }

    /// A frame whose root viewport reports its outer top-left at `min`
    fn reporting(min: egui::Pos2) -> egui::RawInput {
        let mut input = egui::RawInput::default();
        input.viewports.entry(egui::ViewportId::ROOT).or_default().outer_rect =
            Some(egui::Rect::from_min_size(min, egui::vec2(150.0, 150.0)));
        input
    }

    #[test]
    fn test_stale_reports_ignored_while_settling() {
        let ctx = Context::default();
        let mut window = ViewportWindow::new(Position::new(0.0, 0.0));
        let _ = ctx.run(reporting(egui::pos2(0.0, 50.0)), |ctx| window.sync(ctx));
        assert_eq!(window.outer_position(), Ok(Position::new(0.0, 50.0)));

        window.set_outer_position(Position::new(40.0, 60.0)).unwrap();
        for _ in 0..SETTLE_FRAMES {
            let _ = ctx.run(reporting(egui::pos2(0.0, 50.0)), |ctx| window.sync(ctx));
            assert_eq!(window.outer_position(), Ok(Position::new(40.0, 60.0)));
        }

        // Settled: the OS report is trusted again
        let _ = ctx.run(reporting(egui::pos2(41.0, 60.0)), |ctx| window.sync(ctx));
        assert_eq!(window.outer_position(), Ok(Position::new(41.0, 60.0)));
    }
}
