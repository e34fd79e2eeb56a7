//! Pet window geometry
//!
//! - **geometry**: preset-driven resize/move controller, platform agnostic
//! - **viewport**: eframe root viewport implementation of the platform trait

pub mod geometry;
pub mod viewport;

pub use geometry::{WindowGeometryController, WindowPlatform};
pub use viewport::ViewportWindow;
