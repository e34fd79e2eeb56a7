//! Application mode state machine
//!
//! Owns `AppMode` plus the orthogonal minimized flag, reacts to
//! SecondaryClick gestures and menu requests, and drives the window geometry.

use tracing::{debug, info};

use crate::constants::window;
use crate::error::PetError;
use crate::types::Dimensions;
use crate::window::{WindowGeometryController, WindowPlatform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    Menu,
    FullContent,
}

/// Actions emitted by the menu UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Minimize,
    ShowAbout,
    Exit,
    /// Close button of the content panel
    BackToMenu,
}

/// What gets drawn for the current state, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderLayer {
    FallbackIcon,
    Pet,
    MenuOverlay,
}

/// Result of feeding a request into the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed,
    Unchanged,
    /// The process should release its resources and terminate
    Exit,
}

#[derive(Debug)]
pub struct AppStateMachine {
    mode: AppMode,
    minimized: bool,
    content: Option<String>,
    about_text: String,
}

impl AppStateMachine {
    pub fn new(about_text: impl Into<String>) -> Self {
        Self {
            mode: AppMode::Normal,
            minimized: false,
            content: None,
            about_text: about_text.into(),
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    /// Text shown while in FullContent mode
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Window preset the current state should be displayed with
    pub fn preset(&self) -> Dimensions {
        match (self.mode, self.minimized) {
            (_, true) => window::MINIMIZED,
            (AppMode::Normal, false) => window::NORMAL,
            (AppMode::Menu | AppMode::FullContent, false) => window::MENU_EXPANDED,
        }
    }

    /// Layers to render this frame, pure function of state
    pub fn render_layers(&self) -> &'static [RenderLayer] {
        if self.minimized {
            return &[RenderLayer::FallbackIcon];
        }
        match self.mode {
            AppMode::Normal => &[RenderLayer::Pet],
            AppMode::Menu => &[RenderLayer::Pet, RenderLayer::MenuOverlay],
            AppMode::FullContent => &[RenderLayer::MenuOverlay],
        }
    }

    pub fn on_secondary_click<W: WindowPlatform>(
        &mut self,
        geometry: &mut WindowGeometryController<W>,
    ) -> Transition {
        match (self.mode, self.minimized) {
            (_, true) => {
                geometry.restore();
                // The normal preset is too narrow for the menu
                geometry.expand();
                self.minimized = false;
                self.mode = AppMode::Menu;
                info!("Restored from minimized into menu");
                Transition::Changed
            }
            (AppMode::Normal, false) => {
                geometry.expand();
                self.mode = AppMode::Menu;
                info!("Menu shown");
                Transition::Changed
            }
            (AppMode::Menu, false) => {
                geometry.restore();
                self.mode = AppMode::Normal;
                info!("Menu hidden");
                Transition::Changed
            }
            (AppMode::FullContent, false) => self.ignore("secondary_click"),
        }
    }

    pub fn request_minimize<W: WindowPlatform>(
        &mut self,
        geometry: &mut WindowGeometryController<W>,
    ) -> Transition {
        if self.minimized {
            debug!("Already minimized");
            return Transition::Unchanged;
        }
        if self.mode == AppMode::FullContent {
            return self.ignore("minimize");
        }
        geometry.minimize();
        self.minimized = true;
        info!(mode = ?self.mode, "Minimized");
        Transition::Changed
    }

    pub fn request_show_content(&mut self, text: impl Into<String>) -> Transition {
        if self.minimized {
            return self.ignore("show_content");
        }
        self.content = Some(text.into());
        self.mode = AppMode::FullContent;
        info!("Showing content panel");
        Transition::Changed
    }

    pub fn request_back_to_menu(&mut self) -> Transition {
        if self.mode != AppMode::FullContent || self.minimized {
            return self.ignore("back_to_menu");
        }
        self.mode = AppMode::Menu;
        info!("Back to menu");
        Transition::Changed
    }

    pub fn request_exit(&mut self) -> Transition {
        info!(mode = ?self.mode, minimized = self.minimized, "Exit requested");
        Transition::Exit
    }

    /// Dispatch a menu button press
    pub fn dispatch<W: WindowPlatform>(
        &mut self,
        action: MenuAction,
        geometry: &mut WindowGeometryController<W>,
    ) -> Transition {
        debug!(?action, "Menu action");
        match action {
            MenuAction::Minimize => self.request_minimize(geometry),
            MenuAction::ShowAbout => {
                let text = self.about_text.clone();
                self.request_show_content(text)
            }
            MenuAction::Exit => self.request_exit(),
            MenuAction::BackToMenu => self.request_back_to_menu(),
        }
    }

    fn ignore(&self, request: &'static str) -> Transition {
        let err = PetError::InvalidTransition {
            request,
            state: format!("({:?}, minimized={})", self.mode, self.minimized),
        };
        debug!(error = %err, "Ignoring request");
        Transition::Unchanged
    }
}
