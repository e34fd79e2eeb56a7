//! Character animation
//!
//! - **coordinator**: click-triggered one-shot playback on top of a looping idle
//! - **flipbook**: PNG frame sequence engine used by the desktop app
//!
//! The core only talks to an engine through [`AnimationEngine`]. Completion
//! notifications are returned from `advance` and handled by the caller before
//! the frame is drawn.

pub mod coordinator;
pub mod flipbook;

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::error::PetError;

pub use coordinator::{AnimationTriggerCoordinator, ClipNames};
pub use flipbook::FlipbookEngine;

/// Opaque handle to a character loaded by an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterHandle(pub u32);

impl fmt::Display for CharacterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notifications produced while advancing playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationEvent {
    /// A track entry reached its end (once per loop for looping clips)
    Complete(String),
}

/// Where and how large to draw the character this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTarget {
    /// Bottom-center anchor in window coordinates
    pub anchor: egui::Pos2,
}

pub trait AnimationEngine {
    fn load_character(&mut self, dir: &Path, name: &str) -> anyhow::Result<CharacterHandle>;

    /// Replace whatever plays on the primary track
    fn set_pose(&mut self, handle: CharacterHandle, animation: &str, looping: bool) -> Result<(), PetError>;

    /// Append to the primary track, starting `delay` seconds after the previous entry ends
    fn queue_pose(
        &mut self,
        handle: CharacterHandle,
        animation: &str,
        looping: bool,
        delay: f32,
    ) -> Result<(), PetError>;

    /// Register a cross-fade duration between two clips
    fn set_mix(&mut self, handle: CharacterHandle, from: &str, to: &str, duration: f32) -> Result<(), PetError>;

    fn advance(&mut self, handle: CharacterHandle, dt: f32) -> Vec<AnimationEvent>;

    fn draw(&mut self, handle: CharacterHandle, painter: &egui::Painter, target: DrawTarget);

    fn dispose(&mut self, handle: CharacterHandle) -> Result<(), PetError>;

    fn animation_names(&self, handle: CharacterHandle) -> BTreeSet<String>;
}
