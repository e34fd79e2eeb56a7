//! GUI-specific constants for menu layout and colors

use egui;

/// Menu buttons, stacked in the right half of the expanded window
pub const BUTTON_WIDTH: f32 = 120.0;
pub const BUTTON_HEIGHT: f32 = 40.0;
pub const MENU_LEFT: f32 = 165.0;
pub const MENU_TOP: f32 = 10.0;
pub const ITEM_SPACING: f32 = 5.0;

/// Content panel
pub const CONTENT_PADDING: f32 = 8.0;
pub const CONTENT_MAX_HEIGHT: f32 = 90.0;

/// Button labels
pub const LABEL_MINIMIZE: &str = "Minimize";
pub const LABEL_ABOUT: &str = "About";
pub const LABEL_EXIT: &str = "Exit";
pub const LABEL_OK: &str = "[Ok]";

/// Placeholder drawn when no icon image is configured
pub const ICON_FILL: egui::Color32 = egui::Color32::from_rgb(250, 190, 80);
pub const ICON_STROKE: egui::Color32 = egui::Color32::from_rgb(120, 80, 20);
pub const ICON_MARGIN: f32 = 2.0;
