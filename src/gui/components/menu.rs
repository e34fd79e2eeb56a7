use eframe::egui;
use tracing::debug;

use crate::error::PetError;
use crate::gui::constants::*;
use crate::lifecycle::Dispose;
use crate::state::{AppMode, MenuAction, RenderLayer};

/// State for the menu overlay
#[derive(Debug, Default)]
pub struct MenuState {
    released: bool,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Dispose for MenuState {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn dispose(&mut self) -> Result<(), PetError> {
        if self.released {
            return Err(PetError::Dispose {
                resource: "menu",
                reason: "already released".to_string(),
            });
        }
        self.released = true;
        Ok(())
    }
}

/// Draw the overlay for `mode` and return the action the user picked, if any.
/// Nothing is drawn unless `layers` holds the menu overlay.
pub fn ui(
    ctx: &egui::Context,
    state: &MenuState,
    layers: &[RenderLayer],
    mode: AppMode,
    content: Option<&str>,
) -> Option<MenuAction> {
    if state.released || !layers.contains(&RenderLayer::MenuOverlay) {
        return None;
    }

    let action = match mode {
        AppMode::Normal => None,
        AppMode::Menu => buttons(ctx),
        AppMode::FullContent => content_panel(ctx, content.unwrap_or_default()),
    };
    if let Some(action) = &action {
        debug!(?action, "Menu button pressed");
    }
    action
}

fn buttons(ctx: &egui::Context) -> Option<MenuAction> {
    egui::Area::new(egui::Id::new("pet_menu"))
        .fixed_pos(egui::pos2(MENU_LEFT, MENU_TOP))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = ITEM_SPACING;
            let mut action = None;
            for (label, button_action) in [
                (LABEL_MINIMIZE, MenuAction::Minimize),
                (LABEL_ABOUT, MenuAction::ShowAbout),
                (LABEL_EXIT, MenuAction::Exit),
            ] {
                if ui
                    .add_sized([BUTTON_WIDTH, BUTTON_HEIGHT], egui::Button::new(label))
                    .clicked()
                {
                    action = Some(button_action);
                }
            }
            action
        })
        .inner
}

fn content_panel(ctx: &egui::Context, text: &str) -> Option<MenuAction> {
    let size: egui::Vec2 = crate::constants::window::MENU_EXPANDED.into();
    egui::Area::new(egui::Id::new("pet_content"))
        .fixed_pos(egui::Pos2::ZERO)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(&ctx.style())
                .show(ui, |ui| {
                    ui.set_width(size.x - 2.0 * CONTENT_PADDING);
                    egui::ScrollArea::vertical()
                        .max_height(CONTENT_MAX_HEIGHT)
                        .show(ui, |ui| ui.label(text));
                    ui.vertical_centered(|ui| ui.button(LABEL_OK).clicked())
                        .inner
                        .then_some(MenuAction::BackToMenu)
                })
                .inner
        })
        .inner
}
