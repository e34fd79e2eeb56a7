use tracing::trace;

use crate::types::{Delta, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Raw pointer event in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawPointerEvent {
    Down { button: PointerButton, position: Position },
    Up { button: PointerButton, position: Position },
    Move { position: Position },
}

/// High-level gesture derived from raw pointer events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Incremental movement since the previous drag step
    Drag(Delta),
    /// Primary press and release with no movement in between
    Click,
    /// Secondary press
    SecondaryClick,
}

#[derive(Debug, Default)]
pub struct GestureState {
    pub mouse_down_position: Position,
    pub primary_down: bool,
    pub dragging: bool,
}

/// Turns raw pointer events into Drag/Click/SecondaryClick.
///
/// Any movement while the primary button is held makes the press a drag and
/// suppresses its Click, no matter how small the movement was.
#[derive(Debug, Default)]
pub struct InputGestureClassifier {
    state: GestureState,
}

impl InputGestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    pub fn handle(&mut self, event: RawPointerEvent) -> Option<Gesture> {
        match event {
            RawPointerEvent::Down {
                button: PointerButton::Primary,
                position,
            } => {
                self.state.mouse_down_position = position;
                self.state.primary_down = true;
                self.state.dragging = false;
                None
            }
            RawPointerEvent::Down {
                button: PointerButton::Secondary,
                ..
            } => Some(Gesture::SecondaryClick),
            RawPointerEvent::Move { position } => {
                if !self.state.primary_down {
                    return None;
                }
                let delta = position - self.state.mouse_down_position;
                if delta.is_zero() {
                    return None;
                }
                self.state.dragging = true;
                self.state.mouse_down_position = position;
                trace!(dx = delta.dx, dy = delta.dy, "Drag step");
                Some(Gesture::Drag(delta))
            }
            RawPointerEvent::Up {
                button: PointerButton::Primary,
                ..
            } => {
                // Release without a matching press (e.g. pressed over the menu)
                if !self.state.primary_down {
                    return None;
                }
                self.state.primary_down = false;
                let was_dragging = std::mem::take(&mut self.state.dragging);
                (!was_dragging).then_some(Gesture::Click)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f32, y: f32) -> RawPointerEvent {
        RawPointerEvent::Down {
            button: PointerButton::Primary,
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

    fn feed(classifier: &mut InputGestureClassifier, events: &[RawPointerEvent]) -> Vec<Gesture> {
        events.iter().filter_map(|e| classifier.handle(*e)).collect()
    }

    #[test]
    fn test_press_release_is_single_click() {
        let mut classifier = InputGestureClassifier::new();
        let gestures = feed(&mut classifier, &[down(10.0, 10.0), up(10.0, 10.0)]);
        assert_eq!(gestures, vec![Gesture::Click]);
    }

    #[test]
    fn test_any_movement_suppresses_click() {
        for delta in [0.5_f32, 1.0, 40.0, -3.0] {
            let mut classifier = InputGestureClassifier::new();
            let gestures = feed(
                &mut classifier,
                &[down(10.0, 10.0), mv(10.0 + delta, 10.0), up(10.0 + delta, 10.0)],
            );
            assert!(!gestures.contains(&Gesture::Click), "delta {delta}");
            assert!(gestures.iter().any(|g| matches!(g, Gesture::Drag(_))), "delta {delta}");
        }
    }

    #[test]
    fn test_drag_deltas_are_incremental() {
        let mut classifier = InputGestureClassifier::new();
        let gestures = feed(
            &mut classifier,
            &[down(0.0, 0.0), mv(5.0, 5.0), mv(8.0, 3.0), up(8.0, 3.0)],
        );
        assert_eq!(
            gestures,
            vec![
                Gesture::Drag(Delta::new(5.0, 5.0)),
                Gesture::Drag(Delta::new(3.0, -2.0)),
            ]
        );
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut classifier = InputGestureClassifier::new();
        assert_eq!(feed(&mut classifier, &[mv(5.0, 5.0), mv(9.0, 1.0)]), vec![]);
        assert!(!classifier.is_dragging());
    }

    #[test]
    fn test_secondary_down_emits_immediately() {
        let mut classifier = InputGestureClassifier::new();
        let gestures = feed(
            &mut classifier,
            &[RawPointerEvent::Down {
                button: PointerButton::Secondary,
                position: Position::new(1.0, 1.0),
            }],
        );
        assert_eq!(gestures, vec![Gesture::SecondaryClick]);
    }

    #[test]
    fn test_drag_state_resets_on_release() {
        let mut classifier = InputGestureClassifier::new();
        feed(&mut classifier, &[down(0.0, 0.0), mv(2.0, 2.0)]);
        assert!(classifier.is_dragging());

        feed(&mut classifier, &[up(2.0, 2.0)]);
        assert!(!classifier.is_dragging());
        assert!(!classifier.state().primary_down);

        // Next press/release is a plain click again
        assert_eq!(
            feed(&mut classifier, &[down(2.0, 2.0), up(2.0, 2.0)]),
            vec![Gesture::Click]
        );
    }

    #[test]
    fn test_middle_button_ignored() {
        let mut classifier = InputGestureClassifier::new();
        let gestures = feed(
            &mut classifier,
            &[
                RawPointerEvent::Down {
                    button: PointerButton::Middle,
                    position: Position::new(0.0, 0.0),
                },
                mv(4.0, 4.0),
            ],
        );
        assert!(gestures.is_empty());
    }
}
