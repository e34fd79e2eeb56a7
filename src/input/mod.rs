//! Pointer input handling
//!
//! - **gesture**: click/drag/secondary-click classification
//! - **egui_events**: translation of egui pointer events into raw events

pub mod egui_events;
pub mod gesture;

pub use egui_events::to_raw_pointer_event;
pub use gesture::{Gesture, InputGestureClassifier, PointerButton, RawPointerEvent};
