use std::path::Path;

use eframe::egui;
use tracing::{info, warn};

use crate::assets::{self, RgbaImage};
use crate::error::PetError;
use crate::gui::constants::*;
use crate::lifecycle::Dispose;

/// Icon shown while the pet is minimized
#[derive(Default)]
pub struct MinIcon {
    image: Option<RgbaImage>,
    texture: Option<egui::TextureHandle>,
}

impl MinIcon {
    pub fn new(image: Option<RgbaImage>) -> Self {
        Self {
            image,
            texture: None,
        }
    }

    /// Decode the configured icon, falling back to the painted placeholder
    pub fn load_image(path: Option<&Path>) -> Option<RgbaImage> {
        let path = path?;
        match assets::load_png(path) {
            Ok(image) => {
                info!(path = %path.display(), width = image.width, height = image.height, "Loaded icon");
                Some(image)
            }
            Err(e) => {
                warn!(path = %path.display(), error = ?e, "Failed to load icon, using placeholder");
                None
            }
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn paint(&mut self, painter: &egui::Painter, rect: egui::Rect) {
        let Some(image) = &self.image else {
            let radius = rect.width().min(rect.height()) / 2.0 - ICON_MARGIN;
            painter.circle(
                rect.center(),
                radius,
                ICON_FILL,
                egui::Stroke::new(ICON_MARGIN, ICON_STROKE),
            );
            return;
        };

        let texture = self.texture.get_or_insert_with(|| {
            painter
                .ctx()
                .load_texture("min_icon", image.to_color_image(), egui::TextureOptions::LINEAR)
        });
        painter.image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }
}

impl Dispose for MinIcon {
    fn name(&self) -> &'static str {
        "minimized icon"
    }

    fn dispose(&mut self) -> Result<(), PetError> {
        self.texture = None;
        self.image = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_icon_falls_back_to_placeholder() {
        assert!(MinIcon::load_image(None).is_none());

        let path = std::env::temp_dir().join("yatdp-no-such-icon.png");
        assert!(MinIcon::load_image(Some(&path)).is_none());
    }

    #[test]
    fn test_dispose_drops_image() {
        let mut icon = MinIcon::new(Some(RgbaImage {
            width: 1,
            height: 1,
            pixels: vec![0, 0, 0, 255],
        }));
        assert!(icon.has_image());

        icon.dispose().unwrap();
        assert!(!icon.has_image());
    }
}
