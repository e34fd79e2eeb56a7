//! Desktop shell: eframe window, menu overlay and minimized icon

pub mod app;
pub mod components;
pub mod constants;

pub use app::run_pet;
