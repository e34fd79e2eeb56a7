//! Frame-sequence animation engine
//!
//! A character is a JSON manifest next to its PNG frames:
//!
//! ```json
//! { "scale": 0.3,
//!   "animations": {
//!     "idle":     { "fps": 8,  "frames": ["idle_0.png", "idle_1.png"] },
//!     "interact": { "fps": 12, "frames": ["wave_0.png", "wave_1.png"] } } }
//! ```
//!
//! Each character has a single track: the current entry plus a queue of
//! entries that start once the previous one ends.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{AnimationEngine, AnimationEvent, CharacterHandle, DrawTarget};
use crate::assets::{self, RgbaImage};
use crate::constants::flipbook::{DEFAULT_FPS, DEFAULT_SCALE, MANIFEST_EXTENSION};
use crate::error::PetError;

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default = "default_scale")]
    scale: f32,
    animations: BTreeMap<String, ClipManifest>,
}

#[derive(Debug, Deserialize)]
struct ClipManifest {
    #[serde(default = "default_fps")]
    fps: f32,
    frames: Vec<String>,
}

fn default_scale() -> f32 {
    DEFAULT_SCALE
}

fn default_fps() -> f32 {
    DEFAULT_FPS
}

struct Clip {
    fps: f32,
    frames: Vec<RgbaImage>,
    textures: Vec<egui::TextureHandle>,
}

impl Clip {
    fn duration(&self) -> f32 {
        self.frames.len() as f32 / self.fps
    }

    fn frame_index(&self, time: f32, looping: bool) -> usize {
        let count = self.frames.len();
        let index = (time * self.fps).max(0.0) as usize;
        if looping {
            index % count
        } else {
            index.min(count - 1)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TrackEntry {
    clip: String,
    looping: bool,
    time: f32,
    /// Seconds after the previous entry ends before this one starts
    delay: f32,
    /// Non-looping entry reached its end and reported completion
    completed: bool,
}

impl TrackEntry {
    fn new(clip: &str, looping: bool, delay: f32) -> Self {
        Self {
            clip: clip.to_string(),
            looping,
            time: 0.0,
            delay,
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Fade {
    from: TrackEntry,
    elapsed: f32,
    duration: f32,
}

struct Character {
    name: String,
    scale: f32,
    clips: HashMap<String, Clip>,
    mixes: HashMap<(String, String), f32>,
    current: Option<TrackEntry>,
    queue: VecDeque<TrackEntry>,
    fade: Option<Fade>,
    /// Time spent past the end of a finished non-looping entry
    overrun: f32,
}

impl Character {
    fn new(name: &str, scale: f32, clips: HashMap<String, Clip>) -> Self {
        Self {
            name: name.to_string(),
            scale,
            clips,
            mixes: HashMap::new(),
            current: None,
            queue: VecDeque::new(),
            fade: None,
            overrun: 0.0,
        }
    }

    fn require(&self, clip: &str) -> Result<(), PetError> {
        if self.clips.contains_key(clip) {
            Ok(())
        } else {
            Err(PetError::MissingClip {
                character: self.name.clone(),
                clip: clip.to_string(),
            })
        }
    }

    /// Make `entry` current, cross-fading from the previous entry if a mix is registered
    fn start(&mut self, entry: TrackEntry) {
        if let Some(previous) = self.current.take() {
            let key = (previous.clip.clone(), entry.clip.clone());
            self.fade = self.mixes.get(&key).map(|duration| Fade {
                from: previous,
                elapsed: 0.0,
                duration: *duration,
            });
        }
        self.overrun = 0.0;
        self.current = Some(entry);
    }

    fn advance(&mut self, dt: f32) -> Vec<AnimationEvent> {
        let mut events = Vec::new();

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            fade.from.time += dt;
            if fade.elapsed >= fade.duration {
                self.fade = None;
            }
        }

        let mut remaining = dt;
        while remaining > 0.0 {
            let Some(current) = self.current.as_mut() else {
                break;
            };
            let duration = self.clips.get(&current.clip).map_or(0.0, Clip::duration);

            if current.looping {
                let before = current.time;
                current.time += remaining;
                let after = current.time;
                remaining = 0.0;
                if duration > 0.0 {
                    let loops = (after / duration).floor() - (before / duration).floor();
                    for _ in 0..loops as usize {
                        events.push(AnimationEvent::Complete(current.clip.clone()));
                    }
                    // A queued entry takes over at the end of the loop it was queued in
                    let next_delay = self.queue.front().map(|next| next.delay);
                    if let Some(delay) = next_delay
                        && loops_finished(before, after, duration, delay)
                        && let Some(next) = self.queue.pop_front()
                    {
                        self.start(next);
                    }
                }
                continue;
            }

            // Non-looping: run up to the end, report completion once.
            // The queue is only consulted after completion was reported.
            if !current.completed {
                let until_end = (duration - current.time).max(0.0);
                if remaining < until_end {
                    current.time += remaining;
                    break;
                }
                current.time = duration;
                remaining -= until_end;
                current.completed = true;
                events.push(AnimationEvent::Complete(current.clip.clone()));
            }

            match self.queue.front().map(|next| next.delay) {
                Some(delay) => {
                    let wait = (delay - self.overrun).max(0.0);
                    if remaining >= wait {
                        remaining -= wait;
                        if let Some(next) = self.queue.pop_front() {
                            self.start(next);
                        }
                    } else {
                        self.overrun += remaining;
                        remaining = 0.0;
                    }
                }
                None => {
                    // Hold the last frame
                    self.overrun += remaining;
                    remaining = 0.0;
                }
            }
        }

        events
    }
}

/// Reject clips whose duration would not be a positive, finite number of seconds
fn check_timing(character: &str, clip: &str, frames: usize, fps: f32) -> Result<(), PetError> {
    if frames == 0 {
        return Err(PetError::Asset(format!("animation '{clip}' of '{character}' has no frames")));
    }
    if !fps.is_finite() || fps <= 0.0 {
        return Err(PetError::Asset(format!(
            "animation '{clip}' of '{character}' has invalid fps {fps}"
        )));
    }
    let duration = frames as f32 / fps;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(PetError::Asset(format!(
            "animation '{clip}' of '{character}' is too short ({frames} frames at {fps} fps)"
        )));
    }
    Ok(())
}

/// Whether a looping entry crossed a loop boundary plus `delay` during this step
fn loops_finished(before: f32, after: f32, duration: f32, delay: f32) -> bool {
    let boundary = ((before / duration).floor() + 1.0) * duration + delay.max(0.0);
    after >= boundary
}

/// Engine drawing PNG frame sequences with egui
#[derive(Default)]
pub struct FlipbookEngine {
    characters: HashMap<CharacterHandle, Character>,
    next_handle: u32,
}

impl FlipbookEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn character(&self, handle: CharacterHandle) -> Result<&Character, PetError> {
        self.characters
            .get(&handle)
            .ok_or(PetError::UnknownCharacter(handle.0))
    }

    fn character_mut(&mut self, handle: CharacterHandle) -> Result<&mut Character, PetError> {
        self.characters
            .get_mut(&handle)
            .ok_or(PetError::UnknownCharacter(handle.0))
    }

    fn insert(&mut self, character: Character) -> CharacterHandle {
        self.next_handle += 1;
        let handle = CharacterHandle(self.next_handle);
        self.characters.insert(handle, character);
        handle
    }

    fn upload(ctx: &egui::Context, name: &str, clip_name: &str, clip: &mut Clip) {
        if clip.textures.len() == clip.frames.len() {
            return;
        }
        clip.textures = clip
            .frames
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                ctx.load_texture(
                    format!("{name}/{clip_name}/{i}"),
                    frame.to_color_image(),
                    egui::TextureOptions::LINEAR,
                )
            })
            .collect();
        debug!(character = name, clip = clip_name, frames = clip.textures.len(), "Uploaded frames");
    }

    fn paint(
        painter: &egui::Painter,
        character: &mut Character,
        entry: &TrackEntry,
        target: DrawTarget,
        alpha: f32,
    ) {
        let scale = character.scale;
        let name = character.name.clone();
        let Some(clip) = character.clips.get_mut(&entry.clip) else {
            return;
        };
        Self::upload(painter.ctx(), &name, &entry.clip, clip);

        let index = clip.frame_index(entry.time, entry.looping);
        let (Some(frame), Some(texture)) = (clip.frames.get(index), clip.textures.get(index)) else {
            return;
        };
        let size = egui::vec2(frame.width as f32 * scale, frame.height as f32 * scale);
        let rect = egui::Rect::from_min_size(
            egui::pos2(target.anchor.x - size.x / 2.0, target.anchor.y - size.y),
            size,
        );
        painter.image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE.gamma_multiply(alpha),
        );
    }
}

impl AnimationEngine for FlipbookEngine {
    fn load_character(&mut self, dir: &Path, name: &str) -> Result<CharacterHandle> {
        let manifest_path = dir.join(format!("{name}.{MANIFEST_EXTENSION}"));
        let contents = std::fs::read_to_string(&manifest_path)
            .context(format!("Failed to read character manifest {}", manifest_path.display()))?;
        let manifest: Manifest = serde_json::from_str(&contents)
            .context(format!("Failed to parse character manifest {}", manifest_path.display()))?;

        let mut clips = HashMap::new();
        for (clip_name, clip) in manifest.animations {
            check_timing(name, &clip_name, clip.frames.len(), clip.fps)?;
            let frames = clip
                .frames
                .iter()
                .map(|file| assets::load_png(&dir.join(file)))
                .collect::<Result<Vec<_>>>()
                .context(format!("Failed to load frames for animation '{clip_name}'"))?;
            clips.insert(
                clip_name,
                Clip {
                    fps: clip.fps,
                    frames,
                    textures: Vec::new(),
                },
            );
        }

        let handle = self.insert(Character::new(name, manifest.scale, clips));
        info!(character = name, %handle, dir = %dir.display(), "Character loaded");
        Ok(handle)
    }

    fn set_pose(&mut self, handle: CharacterHandle, animation: &str, looping: bool) -> Result<(), PetError> {
        let character = self.character_mut(handle)?;
        character.require(animation)?;
        character.queue.clear();
        character.start(TrackEntry::new(animation, looping, 0.0));
        Ok(())
    }

    fn queue_pose(
        &mut self,
        handle: CharacterHandle,
        animation: &str,
        looping: bool,
        delay: f32,
    ) -> Result<(), PetError> {
        let character = self.character_mut(handle)?;
        character.require(animation)?;
        let entry = TrackEntry::new(animation, looping, delay);
        if character.current.is_none() {
            character.start(entry);
        } else {
            character.queue.push_back(entry);
        }
        Ok(())
    }

    fn set_mix(&mut self, handle: CharacterHandle, from: &str, to: &str, duration: f32) -> Result<(), PetError> {
        let character = self.character_mut(handle)?;
        character.require(from)?;
        character.require(to)?;
        character
            .mixes
            .insert((from.to_string(), to.to_string()), duration.max(0.0));
        Ok(())
    }

    fn advance(&mut self, handle: CharacterHandle, dt: f32) -> Vec<AnimationEvent> {
        match self.character_mut(handle) {
            Ok(character) => character.advance(dt),
            Err(e) => {
                warn!(error = %e, "Cannot advance");
                Vec::new()
            }
        }
    }

    fn draw(&mut self, handle: CharacterHandle, painter: &egui::Painter, target: DrawTarget) {
        let Ok(character) = self.character_mut(handle) else {
            return;
        };
        let Some(current) = character.current.clone() else {
            return;
        };

        match character.fade.clone() {
            Some(fade) => {
                let t = (fade.elapsed / fade.duration).clamp(0.0, 1.0);
                Self::paint(painter, character, &fade.from, target, 1.0 - t);
                Self::paint(painter, character, &current, target, t);
            }
            None => Self::paint(painter, character, &current, target, 1.0),
        }
    }

    fn dispose(&mut self, handle: CharacterHandle) -> Result<(), PetError> {
        let character = self
            .characters
            .remove(&handle)
            .ok_or(PetError::UnknownCharacter(handle.0))?;
        info!(character = %character.name, %handle, "Character disposed");
        Ok(())
    }

    fn animation_names(&self, handle: CharacterHandle) -> BTreeSet<String> {
        self.character(handle)
            .map(|c| c.clips.keys().cloned().collect())
            .unwrap_or_default()
    }
}
