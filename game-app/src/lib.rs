pub mod commands;
pub mod config;
pub mod providers;
pub mod render;
pub mod session;
pub mod ui_settings;

pub use config::Config;
pub use session::{GameSession, Services, SessionEvent, SessionOptions};
