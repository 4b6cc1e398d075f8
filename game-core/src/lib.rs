pub mod bot;
pub mod corpus;
pub mod game_events;
pub mod game_state;
pub mod providers;
pub mod rules;

// Re-export main components
pub use bot::*;
pub use corpus::*;
pub use game_events::*;
pub use game_state::*;
pub use providers::*;
pub use rules::*;
