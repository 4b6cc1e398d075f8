pub mod prelude;

pub mod saved_games;
