pub mod menu;
pub mod min_icon;

pub use menu::MenuState;
pub use min_icon::MinIcon;
