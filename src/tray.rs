//! System tray icon (StatusNotifier over D-Bus)
//!
//! The tray runs on its own thread with a current-thread tokio runtime and
//! talks to the UI thread through a channel.

use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use ksni::TrayMethods;
use tracing::{error, info, warn};

use crate::assets::RgbaImage;
use crate::constants::window;

/// Commands sent from the tray thread to the UI thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    Exit,
}

struct PetTray {
    sender: Sender<TrayCommand>,
    icon: Option<RgbaImage>,
}

impl PetTray {
    fn send(&self, command: TrayCommand) {
        if let Err(e) = self.sender.send(command) {
            warn!(?command, error = %e, "UI thread gone, tray command dropped");
        }
    }
}

impl ksni::Tray for PetTray {
    fn id(&self) -> String {
        window::APP_ID.to_string()
    }

    fn title(&self) -> String {
        window::TITLE.to_string()
    }

    fn icon_name(&self) -> String {
        // Used by hosts when no pixmap is provided
        "face-smile".to_string()
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        self.icon
            .iter()
            .map(|image| ksni::Icon {
                width: image.width as i32,
                height: image.height as i32,
                data: image.to_argb(),
            })
            .collect()
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        use ksni::menu::StandardItem;

        vec![
            StandardItem {
                label: "Exit".into(),
                icon_name: "application-exit".into(),
                activate: Box::new(|tray: &mut Self| {
                    info!("Exit requested from tray menu");
                    tray.send(TrayCommand::Exit);
                }),
                ..Default::default()
            }
            .into(),
        ]
    }
}

/// Spawn the tray thread. Registration failures (no StatusNotifier host)
/// are logged on that thread and leave the pet running without a tray.
pub fn spawn_tray(sender: Sender<TrayCommand>, icon: Option<RgbaImage>) -> Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("tray".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!(error = %e, "Failed to build tray runtime");
                    return;
                }
            };

            runtime.block_on(async move {
                match (PetTray { sender, icon }).spawn().await {
                    Ok(_handle) => {
                        info!("Tray icon registered");
                        // The tray service lives on this runtime
                        std::future::pending::<()>().await;
                    }
                    Err(e) => error!(error = %e, "Failed to register tray icon"),
                }
            });
        })
        .context("Failed to spawn tray thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksni::Tray;
    use std::sync::mpsc;

    #[test]
    fn test_tray_icon_pixmap_uses_argb() {
        let (tx, _rx) = mpsc::channel();
        let tray = PetTray {
            sender: tx,
            icon: Some(RgbaImage {
                width: 1,
                height: 1,
                pixels: vec![1, 2, 3, 4],
            }),
        };

        let icons = tray.icon_pixmap();
        assert_eq!(icons.len(), 1);
        assert_eq!(icons[0].data, vec![4, 1, 2, 3]);
        assert_eq!(tray.id(), window::APP_ID);
    }

    #[test]
    fn test_send_reaches_receiver() {
        let (tx, rx) = mpsc::channel();
        let tray = PetTray { sender: tx, icon: None };

        tray.send(TrayCommand::Exit);
        assert_eq!(rx.try_recv(), Ok(TrayCommand::Exit));
        assert!(tray.icon_pixmap().is_empty());
    }
}
