//! Startup configuration record
//!
//! Read once at launch; nothing is written back at runtime.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::animation::ClipNames;
use crate::constants::{animation, config, validation};
use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    /// Directory holding the character manifest and frames
    pub character_dir: PathBuf,

    /// Character asset name (manifest is `<character_dir>/<name>.json`)
    pub character_name: String,

    /// Looping clip
    pub idle_animation: String,

    /// Clip played once when the pet is clicked
    pub interact_animation: String,

    /// PNG drawn while minimized (painted placeholder when unset)
    pub icon_path: Option<PathBuf>,

    /// Initial top-left window position
    pub window_x: f32,
    pub window_y: f32,

    pub always_on_top: bool,

    /// Text of the About panel
    pub about_text: String,

    /// Show a system tray icon with an Exit entry
    pub tray_enabled: bool,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            character_dir: PathBuf::from(config::DEFAULT_CHARACTER_DIR),
            character_name: config::DEFAULT_CHARACTER_NAME.to_string(),
            idle_animation: animation::DEFAULT_IDLE_CLIP.to_string(),
            interact_animation: animation::DEFAULT_INTERACT_CLIP.to_string(),
            icon_path: None,
            window_x: config::DEFAULT_WINDOW_X,
            window_y: config::DEFAULT_WINDOW_Y,
            always_on_top: true,
            about_text: config::DEFAULT_ABOUT_TEXT.to_string(),
            tray_enabled: true,
        }
    }
}

impl PetConfig {
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    /// Load from `path` (or the default location). A missing file yields
    /// defaults; a file that exists but does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => {
                let config = Self::parse(&contents)
                    .context(format!("Failed to parse config file {}", path.display()))?;
                info!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No config file found, using defaults");
                Self::default()
            }
            Err(e) => {
                return Err(e).context(format!("Failed to read config file {}", path.display()));
            }
        };

        config.validate_and_clamp();
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Invalid config JSON")
    }

    pub fn initial_position(&self) -> Position {
        Position::new(self.window_x, self.window_y)
    }

    pub fn clip_names(&self) -> ClipNames {
        ClipNames {
            idle: self.idle_animation.clone(),
            interact: self.interact_animation.clone(),
        }
    }

    /// Replace unusable values with defaults
    pub fn validate_and_clamp(&mut self) {
        let defaults = Self::default();

        if self.character_name.trim().is_empty() {
            warn!(using = %defaults.character_name, "character_name is empty, using default");
            self.character_name = defaults.character_name;
        }

        if self.character_dir.as_os_str().is_empty() {
            warn!(using = %defaults.character_dir.display(), "character_dir is empty, using default");
            self.character_dir = defaults.character_dir;
        }

        if self.idle_animation.trim().is_empty() {
            warn!(using = %defaults.idle_animation, "idle_animation is empty, using default");
            self.idle_animation = defaults.idle_animation;
        }

        if self.interact_animation.trim().is_empty() {
            warn!(using = %defaults.interact_animation, "interact_animation is empty, using default");
            self.interact_animation = defaults.interact_animation;
        }

        if self.idle_animation == self.interact_animation {
            warn!(clip = %self.idle_animation, "idle and interact animations are the same clip");
        }

        if self.icon_path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            warn!("icon_path is empty, using placeholder icon");
            self.icon_path = None;
        }

        for (name, value, default) in [
            ("window_x", &mut self.window_x, defaults.window_x),
            ("window_y", &mut self.window_y, defaults.window_y),
        ] {
            if !value.is_finite() {
                warn!(field = name, using = default, "window coordinate is not finite, using default");
                *value = default;
            } else if value.abs() > validation::MAX_COORDINATE {
                let clamped = value.clamp(-validation::MAX_COORDINATE, validation::MAX_COORDINATE);
                warn!(field = name, value = *value, clamped, "window coordinate out of range, clamping");
                *value = clamped;
            }
        }
    }
}
