pub mod errors;
pub mod game;
pub mod player;
pub mod rules;
pub mod saved;

// Re-export all types
pub use errors::*;
pub use game::*;
pub use player::*;
pub use rules::*;
pub use saved::*;

pub type GameId = String;
pub type PlayerId = String;

/// Generates a fresh opaque identifier for players and games.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
