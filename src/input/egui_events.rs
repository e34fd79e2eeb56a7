use egui::{Event, Pos2};

use super::gesture::{PointerButton, RawPointerEvent};
use crate::types::Position;

/// Convert one egui event to a raw pointer event in screen coordinates.
///
/// `window_origin` is the window's outer top-left as reported this frame.
/// Pointer positions from egui are window-relative; dragging moves the
/// window under the pointer, so deltas have to be taken in screen space.
pub fn to_raw_pointer_event(event: &Event, window_origin: Option<Pos2>) -> Option<RawPointerEvent> {
    let to_screen = |pos: Pos2| -> Position {
        match window_origin {
            Some(origin) => Position::new(origin.x + pos.x, origin.y + pos.y),
            None => pos.into(),
        }
    };

    match event {
        Event::PointerButton {
            pos,
            button,
            pressed,
            ..
        } => {
            let button = map_button(*button)?;
            let position = to_screen(*pos);
            Some(if *pressed {
                RawPointerEvent::Down { button, position }
            } else {
                RawPointerEvent::Up { button, position }
            })
        }
        Event::PointerMoved(pos) => Some(RawPointerEvent::Move {
            position: to_screen(*pos),
        }),
        _ => None,
    }
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_press_translated_to_screen_space() {
        let event = Event::PointerButton {
            pos: egui::pos2(10.0, 20.0),
            button: egui::PointerButton::Primary,
            pressed: true,
            modifiers: egui::Modifiers::NONE,
        };

        let raw = to_raw_pointer_event(&event, Some(egui::pos2(100.0, 50.0)));
        assert_eq!(
            raw,
            Some(RawPointerEvent::Down {
                button: PointerButton::Primary,
                position: Position::new(110.0, 70.0),
            })
        );
    }

    #[test]
    fn test_move_without_origin_stays_relative() {
        let raw = to_raw_pointer_event(&Event::PointerMoved(egui::pos2(3.0, 4.0)), None);
        assert_eq!(
            raw,
            Some(RawPointerEvent::Move {
                position: Position::new(3.0, 4.0)
            })
        );
    }

    #[test]
    fn test_extra_buttons_and_other_events_ignored() {
        let extra = Event::PointerButton {
            pos: egui::pos2(0.0, 0.0),
            button: egui::PointerButton::Extra1,
            pressed: true,
            modifiers: egui::Modifiers::NONE,
        };
        assert_eq!(to_raw_pointer_event(&extra, None), None);
        assert_eq!(to_raw_pointer_event(&Event::PointerGone, None), None);
    }
}
