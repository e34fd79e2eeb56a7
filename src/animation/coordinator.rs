use tracing::{debug, info, warn};

use super::{AnimationEngine, CharacterHandle};
use crate::constants::animation::{MENU_PET_X, MIX_DURATION};
use crate::error::PetError;
use crate::state::AppMode;

/// Clip names the coordinator plays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipNames {
    /// Looping clip the pet falls back to
    pub idle: String,
    /// One-shot clip played on click
    pub interact: String,
}

/// Serializes click-triggered one-shot animations.
///
/// A click while the one-shot is still playing is dropped; the gate reopens
/// when the engine reports the one-shot clip complete.
#[derive(Debug)]
pub struct AnimationTriggerCoordinator {
    handle: CharacterHandle,
    clips: ClipNames,
    playing_one_shot: bool,
}

impl AnimationTriggerCoordinator {
    /// Validate the loaded character, register blends and start idling.
    ///
    /// Fails with `MissingClip` when the character lacks either clip, so a
    /// bad asset is caught at startup rather than on the first click.
    pub fn new<E: AnimationEngine>(
        engine: &mut E,
        handle: CharacterHandle,
        clips: ClipNames,
        character: &str,
    ) -> Result<Self, PetError> {
        let names = engine.animation_names(handle);
        for clip in [&clips.idle, &clips.interact] {
            if !names.contains(clip.as_str()) {
                return Err(PetError::MissingClip {
                    character: character.to_string(),
                    clip: clip.clone(),
                });
            }
        }

        for from in &names {
            for to in names.iter().filter(|to| *to != from) {
                engine.set_mix(handle, from, to, MIX_DURATION)?;
            }
        }
        debug!(clips = names.len(), duration = MIX_DURATION, "Registered cross-fades");

        engine.set_pose(handle, &clips.idle, true)?;
        info!(character, idle = %clips.idle, interact = %clips.interact, "Animation coordinator ready");

        Ok(Self {
            handle,
            clips,
            playing_one_shot: false,
        })
    }

    pub fn handle(&self) -> CharacterHandle {
        self.handle
    }

    pub fn is_playing_one_shot(&self) -> bool {
        self.playing_one_shot
    }

    /// Play the interact clip once, then fall back to idle.
    /// Returns whether the trigger was accepted.
    pub fn on_click<E: AnimationEngine>(&mut self, engine: &mut E) -> bool {
        if self.playing_one_shot {
            debug!("One-shot still playing, click dropped");
            return false;
        }

        if let Err(e) = engine.set_pose(self.handle, &self.clips.interact, false) {
            warn!(error = %e, "Click dropped");
            return false;
        }
        if let Err(e) = engine.queue_pose(self.handle, &self.clips.idle, true, 0.0) {
            warn!(error = %e, "Failed to queue idle after one-shot");
        }

        self.playing_one_shot = true;
        info!(clip = %self.clips.interact, "Clicked: playing one-shot");
        true
    }

    pub fn on_animation_complete(&mut self, clip: &str) {
        if clip == self.clips.interact {
            self.playing_one_shot = false;
            debug!(clip, "One-shot complete");
        }
    }

    /// Horizontal anchor for the pet: left-aligned next to the menu,
    /// centered otherwise
    pub fn pet_x(mode: AppMode, window_width: f32) -> f32 {
        match mode {
            AppMode::Menu => MENU_PET_X,
            _ => window_width / 2.0,
        }
    }
}
