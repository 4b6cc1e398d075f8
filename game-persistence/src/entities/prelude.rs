pub use super::saved_games::Entity as SavedGames;
