//! Per-frame controller
//!
//! Routes classified gestures to the state machine, the window geometry and
//! the animation coordinator, and runs the frame order:
//! advance animation, deliver completions, then draw.

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::animation::{
    AnimationEngine, AnimationEvent, AnimationTriggerCoordinator, CharacterHandle, ClipNames, DrawTarget,
};
use crate::config::PetConfig;
use crate::constants::animation::MAX_FRAME_DELTA;
use crate::error::PetError;
use crate::input::{Gesture, InputGestureClassifier, RawPointerEvent};
use crate::lifecycle::{Dispose, release_all};
use crate::state::{AppMode, AppStateMachine, MenuAction, RenderLayer, Transition};
use crate::window::{WindowGeometryController, WindowPlatform};

/// Character loaded into an engine, released through the engine
struct LoadedCharacter<'a, E> {
    engine: &'a mut E,
    handle: CharacterHandle,
}

impl<E: AnimationEngine> Dispose for LoadedCharacter<'_, E> {
    fn name(&self) -> &'static str {
        "animation engine"
    }

    fn dispose(&mut self) -> Result<(), PetError> {
        self.engine.dispose(self.handle)
    }
}

pub struct PetController<W, E> {
    state: AppStateMachine,
    geometry: WindowGeometryController<W>,
    classifier: InputGestureClassifier,
    coordinator: AnimationTriggerCoordinator,
    engine: E,
    released: bool,
}

impl<W: WindowPlatform, E: AnimationEngine> PetController<W, E> {
    /// Wire up an already loaded character. The handle is disposed again if
    /// the character lacks a required clip.
    pub fn new(
        mut engine: E,
        platform: W,
        handle: CharacterHandle,
        character: &str,
        clips: ClipNames,
        about_text: &str,
    ) -> Result<Self, PetError> {
        let coordinator = match AnimationTriggerCoordinator::new(&mut engine, handle, clips, character) {
            Ok(coordinator) => coordinator,
            Err(e) => {
                if let Err(dispose_err) = engine.dispose(handle) {
                    warn!(error = %dispose_err, "Failed to dispose rejected character");
                }
                return Err(e);
            }
        };

        Ok(Self {
            state: AppStateMachine::new(about_text),
            geometry: WindowGeometryController::new(platform),
            classifier: InputGestureClassifier::new(),
            coordinator,
            engine,
            released: false,
        })
    }

    /// Load the configured character and wire everything up
    pub fn load(mut engine: E, platform: W, config: &PetConfig) -> anyhow::Result<Self> {
        let handle = engine
            .load_character(&config.character_dir, &config.character_name)
            .context(format!(
                "Failed to load character '{}' from {}",
                config.character_name,
                config.character_dir.display()
            ))?;

        Self::new(
            engine,
            platform,
            handle,
            &config.character_name,
            config.clip_names(),
            &config.about_text,
        )
        .context(format!("Character '{}' is missing a required animation", config.character_name))
    }

    pub fn state(&self) -> &AppStateMachine {
        &self.state
    }

    pub fn mode(&self) -> AppMode {
        self.state.mode()
    }

    pub fn geometry(&self) -> &WindowGeometryController<W> {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut WindowGeometryController<W> {
        &mut self.geometry
    }

    pub fn coordinator(&self) -> &AnimationTriggerCoordinator {
        &self.coordinator
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Window top-left in screen space, as last commanded or settled.
    /// Pointer positions are offset by this to get screen coordinates.
    pub fn window_origin(&self) -> Option<egui::Pos2> {
        self.geometry.platform().outer_position().ok().map(Into::into)
    }

    pub fn render_layers(&self) -> &'static [RenderLayer] {
        self.state.render_layers()
    }

    pub fn handle_pointer(&mut self, event: RawPointerEvent) -> Transition {
        let Some(gesture) = self.classifier.handle(event) else {
            return Transition::Unchanged;
        };

        match gesture {
            Gesture::Drag(delta) => {
                self.geometry.move_by(delta.dx, delta.dy);
                Transition::Unchanged
            }
            Gesture::Click => {
                // Only a visible pet reacts to clicks
                if self.render_layers().contains(&RenderLayer::Pet) {
                    self.coordinator.on_click(&mut self.engine);
                } else {
                    debug!("Click ignored, pet not shown");
                }
                Transition::Unchanged
            }
            Gesture::SecondaryClick => self.state.on_secondary_click(&mut self.geometry),
        }
    }

    pub fn handle_menu_action(&mut self, action: MenuAction) -> Transition {
        self.state.dispatch(action, &mut self.geometry)
    }

    pub fn request_exit(&mut self) -> Transition {
        self.state.request_exit()
    }

    /// Advance playback and deliver completion notifications.
    /// Must run before `draw_pet` in the same frame.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DELTA);
        for event in self.engine.advance(self.coordinator.handle(), dt) {
            match event {
                AnimationEvent::Complete(clip) => self.coordinator.on_animation_complete(&clip),
            }
        }
    }

    /// Bottom-center anchor of the pet inside the window for the current mode
    pub fn pet_anchor(&self) -> egui::Pos2 {
        let preset = self.state.preset();
        egui::pos2(
            AnimationTriggerCoordinator::pet_x(self.state.mode(), preset.width),
            preset.height,
        )
    }

    pub fn draw_pet(&mut self, painter: &egui::Painter) {
        let target = DrawTarget {
            anchor: self.pet_anchor(),
        };
        self.engine.draw(self.coordinator.handle(), painter, target);
    }

    /// Release the character, the window and then `ui`. Every resource is
    /// released even if an earlier one fails. Runs once; later calls are no-ops.
    pub fn shutdown(&mut self, ui: &mut [&mut dyn Dispose]) -> Vec<PetError> {
        if self.released {
            debug!("Already shut down");
            return Vec::new();
        }
        self.released = true;

        let mut character = LoadedCharacter {
            engine: &mut self.engine,
            handle: self.coordinator.handle(),
        };
        let mut core: [&mut dyn Dispose; 2] = [&mut character, &mut self.geometry];
        let mut errors = release_all(&mut core);
        errors.extend(release_all(ui));

        info!(failures = errors.len(), "Shutdown complete");
        errors
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::animation::test_support::RecordingEngine;
    use crate::constants::{animation, window};
    use crate::input::PointerButton;
    use crate::types::Position;
    use crate::window::geometry::test_support::RecordingWindow;

    fn clips() -> ClipNames {
        ClipNames {
            idle: "idle".to_string(),
            interact: "interact".to_string(),
        }
    }

    fn controller() -> PetController<RecordingWindow, RecordingEngine> {
        PetController::new(
            RecordingEngine::with_clips(&["idle", "interact"]),
            RecordingWindow::at(0.0, 50.0),
            CharacterHandle(1),
            "pet",
            clips(),
            "about",
        )
        .unwrap()
    }

    fn down(button: PointerButton, x: f32, y: f32) -> RawPointerEvent {
        RawPointerEvent::Down {
            button,
            position: Position::new(x, y),
        }
    }

    fn up(x: f32, y: f32) -> RawPointerEvent {
        RawPointerEvent::Up {
            button: PointerButton::Primary,
            position: Position::new(x, y),
        }
    }

    fn mv(x: f32, y: f32) -> RawPointerEvent {
        RawPointerEvent::Move {
            position: Position::new(x, y),
        }
    }

    fn click(controller: &mut PetController<RecordingWindow, RecordingEngine>) {
        controller.handle_pointer(down(PointerButton::Primary, 10.0, 10.0));
        controller.handle_pointer(up(10.0, 10.0));
    }

    #[test]
    fn test_drag_moves_window_incrementally() {
        let mut controller = controller();
        controller.handle_pointer(down(PointerButton::Primary, 10.0, 60.0));
        controller.handle_pointer(mv(15.0, 65.0));
        controller.handle_pointer(mv(18.0, 63.0));
        controller.handle_pointer(up(18.0, 63.0));

        let platform = controller.geometry().platform();
        assert_eq!(
            platform.moves,
            vec![Position::new(5.0, 55.0), Position::new(8.0, 53.0)]
        );
        // Drag release is not a click
        assert!(!controller.coordinator().is_playing_one_shot());
    }

    #[test]
    fn test_click_triggers_one_shot_once() {
        let mut controller = controller();
        click(&mut controller);
        click(&mut controller);

        assert!(controller.coordinator().is_playing_one_shot());
        let sets = controller
            .engine()
            .commands
            .iter()
            .filter(|c| c.starts_with("set interact"))
            .count();
        assert_eq!(sets, 1);
    }

    #[test]
    fn test_completion_delivered_by_advance_reopens_gate() {
        let mut controller = controller();
        click(&mut controller);

        controller.engine.pending_events = vec![AnimationEvent::Complete("interact".to_string())];
        controller.advance(1.0 / 60.0);
        assert!(!controller.coordinator().is_playing_one_shot());

        click(&mut controller);
        assert!(controller.coordinator().is_playing_one_shot());
    }

    #[test]
    fn test_secondary_click_opens_menu_and_moves_pet() {
        let mut controller = controller();
        assert_eq!(controller.pet_anchor(), egui::pos2(75.0, 150.0));

        let transition = controller.handle_pointer(down(PointerButton::Secondary, 0.0, 0.0));
        assert_eq!(transition, Transition::Changed);
        assert_eq!(controller.mode(), AppMode::Menu);
        assert_eq!(controller.geometry().platform().size, window::MENU_EXPANDED);
        assert_eq!(controller.pet_anchor(), egui::pos2(animation::MENU_PET_X, 150.0));
    }

    #[test]
    fn test_click_ignored_while_minimized() {
        let mut controller = controller();
        controller.handle_menu_action(MenuAction::Minimize);
        click(&mut controller);

        assert!(!controller.coordinator().is_playing_one_shot());
        assert_eq!(controller.render_layers(), &[RenderLayer::FallbackIcon]);
    }

    #[test]
    fn test_menu_exit_requests_exit() {
        let mut controller = controller();
        controller.handle_pointer(down(PointerButton::Secondary, 0.0, 0.0));
        assert_eq!(controller.handle_menu_action(MenuAction::Exit), Transition::Exit);
    }

    #[test]
    fn test_window_origin_follows_drag() {
        let mut controller = controller();
        assert_eq!(controller.window_origin(), Some(egui::pos2(0.0, 50.0)));

        controller.handle_pointer(down(PointerButton::Primary, 10.0, 60.0));
        controller.handle_pointer(mv(25.0, 55.0));
        assert_eq!(controller.window_origin(), Some(egui::pos2(15.0, 45.0)));

        controller.shutdown(&mut Vec::new());
        assert_eq!(controller.window_origin(), None);
    }

    #[test]
    fn test_missing_clip_disposes_character() {
        let engine = RecordingEngine::with_clips(&["idle"]);
        let disposed = Rc::clone(&engine.disposed);
        let result = PetController::new(
            engine,
            RecordingWindow::at(0.0, 0.0),
            CharacterHandle(3),
            "pet",
            clips(),
            "about",
        );
        assert!(matches!(result, Err(PetError::MissingClip { .. })));
        assert_eq!(*disposed.borrow(), vec![CharacterHandle(3)]);
    }

    #[test]
    fn test_load_uses_config_clip_names() {
        let config = PetConfig {
            idle_animation: "Relax".to_string(),
            interact_animation: "Interact".to_string(),
            ..PetConfig::default()
        };

        let ok = PetController::load(
            RecordingEngine::with_clips(&["Relax", "Interact"]),
            RecordingWindow::at(0.0, 0.0),
            &config,
        );
        assert!(ok.is_ok());

        let err = PetController::load(
            RecordingEngine::with_clips(&["idle", "interact"]),
            RecordingWindow::at(0.0, 0.0),
            &config,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_advance_clamps_large_delta() {
        let mut controller = controller();
        // Negative and huge deltas are accepted without panicking
        controller.advance(-1.0);
        controller.advance(10.0);
        assert!(!controller.coordinator().is_playing_one_shot());
    }

    struct Ui {
        released: bool,
    }

    impl Dispose for Ui {
        fn name(&self) -> &'static str {
            "menu"
        }

        fn dispose(&mut self) -> Result<(), PetError> {
            self.released = true;
            Ok(())
        }
    }

    #[test]
    fn test_shutdown_releases_everything_despite_failure() {
        let mut controller = controller();
        controller.engine.fail_dispose = true;
        let mut ui = Ui { released: false };

        let errors = controller.shutdown(&mut [&mut ui as &mut dyn Dispose]);

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], PetError::Dispose { resource: "engine", .. }));
        assert!(!controller.geometry().platform().attached);
        assert!(ui.released);

        // Second shutdown does nothing
        let mut ui = Ui { released: false };
        assert!(controller.shutdown(&mut [&mut ui as &mut dyn Dispose]).is_empty());
        assert!(!ui.released);
    }

    #[test]
    fn test_shutdown_disposes_character_handle() {
        let mut controller = controller();
        let errors = controller.shutdown(&mut Vec::new());

        assert!(errors.is_empty());
        assert_eq!(*controller.engine().disposed.borrow(), vec![CharacterHandle(1)]);
    }
}
