//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Window geometry presets (logical points)
pub mod window {
    use crate::types::Dimensions;

    /// Window size while minimized to the fallback icon
    pub const MINIMIZED: Dimensions = Dimensions::new(32.0, 32.0);

    /// Window size in normal mode (pet only)
    pub const NORMAL: Dimensions = Dimensions::new(150.0, 150.0);

    /// Window size while the menu is expanded next to the pet
    pub const MENU_EXPANDED: Dimensions = Dimensions::new(300.0, 150.0);

    /// Window title (not shown, the window is undecorated)
    pub const TITLE: &str = "Yet Another Tiny Desktop Pet";

    /// App id used by eframe and the tray
    pub const APP_ID: &str = "yatdp";
}

/// Animation timing and placement
pub mod animation {
    /// Cross-fade duration registered between every pair of distinct clips (seconds)
    pub const MIX_DURATION: f32 = 0.1;

    /// Horizontal pet anchor while the menu is shown (left-aligned)
    pub const MENU_PET_X: f32 = 75.0;

    /// Default looping clip
    pub const DEFAULT_IDLE_CLIP: &str = "idle";

    /// Default clip played once on click
    pub const DEFAULT_INTERACT_CLIP: &str = "interact";

    /// Upper bound on frame delta fed to the engine (seconds), avoids jumps after stalls
    pub const MAX_FRAME_DELTA: f32 = 0.25;
}

/// Configuration file constants
pub mod config {
    /// Directory under the user's config dir
    pub const APP_DIR: &str = "yatdp";

    /// Startup configuration file name
    pub const FILENAME: &str = "config.json";

    /// Default character asset directory
    pub const DEFAULT_CHARACTER_DIR: &str = "assets/pet";

    /// Default character asset name (manifest is `<name>.json`)
    pub const DEFAULT_CHARACTER_NAME: &str = "pet";

    /// Initial window position
    pub const DEFAULT_WINDOW_X: f32 = 0.0;
    pub const DEFAULT_WINDOW_Y: f32 = 50.0;

    /// Text shown by the About menu entry
    pub const DEFAULT_ABOUT_TEXT: &str =
        "Yet Another Tiny Desktop Pet\nRight click to restore from minimized.";
}

/// Validation limits for config values
pub mod validation {
    /// Largest accepted absolute window coordinate
    pub const MAX_COORDINATE: f32 = 16384.0;
}

/// Flipbook engine asset constants
pub mod flipbook {
    /// Manifest file extension
    pub const MANIFEST_EXTENSION: &str = "json";

    /// Frame rate used when a clip does not declare one
    pub const DEFAULT_FPS: f32 = 12.0;

    /// Model scale used when the manifest does not declare one
    pub const DEFAULT_SCALE: f32 = 0.3;
}
