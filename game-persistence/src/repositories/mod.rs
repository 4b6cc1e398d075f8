pub mod saved_game_repository;

pub use saved_game_repository::{SavedGameRepository, DEFAULT_MAX_SAVED_GAMES};
