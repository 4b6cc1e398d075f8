#![allow(dead_code)]

use async_trait::async_trait;
use game_core::{Game, GameEvent, GameEventHandler, WordCorpus, WordValidator};
use game_types::Turn;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Creates a corpus with a known set of words
pub fn create_test_corpus() -> WordCorpus {
    let word_list = "cat\ntiger\nrabbit\ntoad\ntopaz\ndog\ngoat\napple\nelephant\ntulip";
    WordCorpus::from_word_list(word_list)
}

pub fn seeded_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(2024)
}

/// Online validator stub that accepts a fixed set of words.
pub struct StubValidator {
    accepted: HashSet<String>,
}

impl StubValidator {
    pub fn accepting(words: &[&str]) -> Self {
        Self {
            accepted: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn rejecting() -> Self {
        Self::accepting(&[])
    }
}

#[async_trait]
impl WordValidator for StubValidator {
    async fn validate(&self, word: &str) -> bool {
        self.accepted.contains(word)
    }
}

/// Collects published events for later inspection.
pub struct RecordingHandler {
    pub events: Arc<Mutex<Vec<GameEvent>>>,
}

impl GameEventHandler for RecordingHandler {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn record_events(game: &mut Game) -> Arc<Mutex<Vec<GameEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    game.event_bus.add_handler(Box::new(RecordingHandler {
        events: events.clone(),
    }));
    events
}

/// Starts a game with the given humans and bots and forces the starting word.
pub fn start_game(corpus: WordCorpus, humans: usize, bots: usize, starting_word: &str) -> Game {
    let mut game = Game::new(corpus);
    game.configure_players(humans, bots).unwrap();
    game.start(&mut seeded_rng()).unwrap();
    game.state.starting_word = Some(starting_word.to_string());
    game
}

pub fn words(turns: &[Turn]) -> Vec<&str> {
    turns.iter().map(|t| t.word.as_str()).collect()
}
