//! Pet window implemented with egui/eframe

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};

use anyhow::{Result, anyhow};
use eframe::{NativeOptions, egui};
use tracing::{error, info, warn};

use super::components::{MenuState, MinIcon, menu};
use crate::animation::FlipbookEngine;
use crate::config::PetConfig;
use crate::constants::window;
use crate::controller::PetController;
use crate::input::{PointerButton, RawPointerEvent, to_raw_pointer_event};
use crate::lifecycle::{self, Dispose};
use crate::state::{RenderLayer, Transition};
use crate::tray::{self, TrayCommand};
use crate::window::ViewportWindow;

struct PetApp {
    controller: PetController<ViewportWindow, FlipbookEngine>,
    menu: MenuState,
    icon: MinIcon,
    tray_rx: Option<Receiver<TrayCommand>>,
    terminate: Arc<AtomicBool>,
    closing: bool,
}

impl PetApp {
    /// Tray and signal exit requests
    fn external_exit_requested(&mut self) -> bool {
        if self.terminate.load(Ordering::Relaxed) {
            info!("Termination signal received");
            return true;
        }
        match self.tray_rx.as_ref().map(Receiver::try_recv) {
            Some(Ok(TrayCommand::Exit)) => true,
            Some(Err(mpsc::TryRecvError::Disconnected)) => {
                warn!("Tray thread exited");
                self.tray_rx = None;
                false
            }
            _ => false,
        }
    }

    /// Feed this frame's pointer events to the controller
    fn process_input(&mut self, ctx: &egui::Context) -> Transition {
        let events = ctx.input(|i| i.events.clone());
        // Settled origin: the OS report lags behind our own moves
        let origin = self.controller.window_origin();
        let over_menu = ctx.is_pointer_over_area();

        for event in &events {
            let Some(raw) = to_raw_pointer_event(event, origin) else {
                continue;
            };
            // Presses on menu widgets belong to the menu
            if over_menu
                && matches!(
                    raw,
                    RawPointerEvent::Down {
                        button: PointerButton::Primary,
                        ..
                    }
                )
            {
                continue;
            }
            if self.controller.handle_pointer(raw) == Transition::Exit {
                return Transition::Exit;
            }
        }
        Transition::Unchanged
    }

    fn draw(&mut self, ctx: &egui::Context) {
        let painter = ctx.layer_painter(egui::LayerId::background());
        for layer in self.controller.render_layers() {
            match layer {
                RenderLayer::FallbackIcon => {
                    let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, window::MINIMIZED.into());
                    self.icon.paint(&painter, rect);
                }
                RenderLayer::Pet => self.controller.draw_pet(&painter),
                // Drawn by `menu::ui` before input is processed, gated on this layer
                RenderLayer::MenuOverlay => {}
            }
        }
    }

    fn shutdown(&mut self) {
        let mut ui: [&mut dyn Dispose; 2] = [&mut self.menu, &mut self.icon];
        let errors = self.controller.shutdown(&mut ui);
        if !errors.is_empty() {
            error!(failures = errors.len(), "Some resources failed to release");
        }
    }

    fn close(&mut self, ctx: &egui::Context) {
        if self.closing {
            return;
        }
        self.closing = true;
        self.shutdown();
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

impl eframe::App for PetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.closing {
            return;
        }
        self.controller.geometry_mut().platform_mut().sync(ctx);

        if self.external_exit_requested() && self.controller.request_exit() == Transition::Exit {
            self.close(ctx);
            return;
        }

        let state = self.controller.state();
        let action = menu::ui(
            ctx,
            &self.menu,
            self.controller.render_layers(),
            state.mode(),
            state.content(),
        );
        if let Some(action) = action
            && self.controller.handle_menu_action(action) == Transition::Exit
        {
            self.close(ctx);
            return;
        }

        if self.process_input(ctx) == Transition::Exit {
            self.close(ctx);
            return;
        }

        // advance → completion callbacks → draw
        let dt = ctx.input(|i| i.stable_dt);
        self.controller.advance(dt);
        self.draw(ctx);

        ctx.request_repaint();
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
        info!("Pet exiting");
    }
}

pub fn run_pet(config: PetConfig) -> Result<()> {
    let controller = PetController::load(
        FlipbookEngine::new(),
        ViewportWindow::new(config.initial_position()),
        &config,
    )?;

    let icon_image = MinIcon::load_image(config.icon_path.as_deref());

    let tray_rx = if config.tray_enabled {
        let (tx, rx) = mpsc::channel();
        match tray::spawn_tray(tx, icon_image.clone()) {
            Ok(_handle) => Some(rx),
            Err(e) => {
                warn!(error = ?e, "Running without tray icon");
                None
            }
        }
    } else {
        None
    };

    let terminate = lifecycle::termination_flag()?;

    let mut viewport = egui::ViewportBuilder::default()
        .with_title(window::TITLE)
        .with_app_id(window::APP_ID)
        .with_inner_size(egui::Vec2::from(window::NORMAL))
        .with_position(config.initial_position())
        .with_decorations(false)
        .with_transparent(true)
        .with_resizable(false)
        .with_taskbar(false);
    if config.always_on_top {
        viewport = viewport.with_always_on_top();
    }

    let options = NativeOptions {
        viewport,
        ..Default::default()
    };

    info!(
        x = config.window_x,
        y = config.window_y,
        character = %config.character_name,
        "Opening pet window"
    );

    let app = PetApp {
        controller,
        menu: MenuState::new(),
        icon: MinIcon::new(icon_image),
        tray_rx,
        terminate,
        closing: false,
    };

    eframe::run_native(window::APP_ID, options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|err| anyhow!("Failed to launch pet window: {err}"))
}
