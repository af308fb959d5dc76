mod app;
mod menu_bar;
mod persist;
mod registration_panel;
mod script_panel;
mod textures;
mod trimming_dialog;

pub use app::{run_app, GuiError};
pub use menu_bar::MenuAction;
pub use persist::UserPreferences;
