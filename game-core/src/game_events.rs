use game_types::{GameId, Player, Rules, Turn};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayersConfigured {
        players: Vec<Player>,
    },
    RulesChanged {
        rules: Rules,
    },
    GameStarted {
        game_id: GameId,
    },
    StartingWordChosen {
        game_id: GameId,
        word: String,
    },
    TurnPlayed {
        game_id: GameId,
        turn: Turn,
        by_bot: bool,
    },
    DefinitionAdded {
        game_id: GameId,
        word: String,
    },
    GameOver {
        game_id: GameId,
        winner: Option<String>,
    },
    GameResumed {
        game_id: GameId,
    },
    GameReset,
}

impl GameEvent {
    pub fn game_id(&self) -> Option<&GameId> {
        match self {
            GameEvent::GameStarted { game_id }
            | GameEvent::StartingWordChosen { game_id, .. }
            | GameEvent::TurnPlayed { game_id, .. }
            | GameEvent::DefinitionAdded { game_id, .. }
            | GameEvent::GameOver { game_id, .. }
            | GameEvent::GameResumed { game_id } => Some(game_id),
            GameEvent::PlayersConfigured { .. }
            | GameEvent::RulesChanged { .. }
            | GameEvent::GameReset => None,
        }
    }

    /// A newly placed word whose definition should be looked up.
    pub fn new_word(&self) -> Option<&str> {
        match self {
            GameEvent::StartingWordChosen { word, .. } => Some(word),
            GameEvent::TurnPlayed { turn, .. } => Some(&turn.word),
            _ => None,
        }
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler: Send {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
