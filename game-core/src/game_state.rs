use game_types::{
    DefinitionRecord, GameError, GameId, GameState, GameStep, Player, PlayerRuleMode, Rules,
    SavedGame, SubmitError, Turn, new_id, normalize_word,
};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::{GameEvent, GameEventBus, RandomBot, RuleEngine, WordCorpus, WordValidator};

#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Upper bound for each of the human and bot counts at setup.
    pub max_players_per_kind: usize,
    pub min_players: usize,
    /// Rule-compliant draws tried before the starting word falls back to any word.
    pub starting_word_attempts: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_players_per_kind: 12,
            min_players: 2,
            starting_word_attempts: 200,
        }
    }
}

/// Outcome of a bot's turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotTurn {
    Played(Turn),
    /// The bot had no legal word; the game is over.
    Stuck { winner: Option<String> },
}

/// The word chain state machine: `setup -> names -> play (running) -> play (over)`.
#[derive(Debug)]
pub struct Game {
    pub state: GameState,
    step: GameStep,
    game_id: Option<GameId>,
    corpus: WordCorpus,
    settings: GameSettings,
    pub event_bus: GameEventBus,
}

impl Game {
    pub fn new(corpus: WordCorpus) -> Self {
        Self::with_settings(corpus, GameSettings::default())
    }

    pub fn with_settings(corpus: WordCorpus, settings: GameSettings) -> Self {
        Self {
            state: GameState::default(),
            step: GameStep::Setup,
            game_id: None,
            corpus,
            settings,
            event_bus: GameEventBus::new(),
        }
    }

    pub fn step(&self) -> GameStep {
        self.step
    }

    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    pub fn corpus(&self) -> &WordCorpus {
        &self.corpus
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// In play and not yet over.
    pub fn is_running(&self) -> bool {
        self.step == GameStep::Play && !self.state.game_over
    }

    pub fn is_over(&self) -> bool {
        self.step == GameStep::Play && self.state.game_over
    }

    pub fn required_letter(&self) -> Option<char> {
        self.state.required_letter()
    }

    /// True when the active player is a bot that is able to move now.
    pub fn bot_to_move(&self) -> bool {
        self.is_running()
            && !self.corpus.is_loading()
            && self.state.starting_word.is_some()
            && self.state.current_player().is_some_and(|p| p.is_bot)
    }

    /// Installs the loaded corpus and picks a starting word if play is waiting on one.
    pub fn set_corpus<R: Rng + ?Sized>(&mut self, corpus: WordCorpus, rng: &mut R) {
        self.corpus = corpus;
        self.ensure_starting_word(rng);
    }

    /// Leaves setup with `humans` humans followed by `bots` bots.
    /// Counts are clamped to the configured maximum per kind.
    pub fn configure_players(
        &mut self,
        humans: usize,
        bots: usize,
    ) -> Result<&[Player], GameError> {
        self.require_step(GameStep::Setup)?;

        let humans = humans.min(self.settings.max_players_per_kind);
        let bots = bots.min(self.settings.max_players_per_kind);
        let total = humans + bots;
        if total < self.settings.min_players {
            return Err(GameError::NotEnoughPlayers {
                required: self.settings.min_players,
                actual: total,
            });
        }

        let players: Vec<Player> = (1..=humans)
            .map(|i| Player::human(format!("Player {i}")))
            .chain((1..=bots).map(|i| Player::bot(format!("Bot {i}"))))
            .collect();

        info!("Configured {} humans and {} bots", humans, bots);
        self.state.players = players.clone();
        self.state.turn_index = 0;
        self.step = GameStep::Names;
        self.event_bus.publish(GameEvent::PlayersConfigured { players });
        Ok(&self.state.players)
    }

    pub fn rename_player(&mut self, player_id: &str, name: &str) -> Result<(), GameError> {
        self.require_step(GameStep::Names)?;
        let player = self
            .state
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| GameError::PlayerNotFound {
                player_id: player_id.to_string(),
            })?;
        player.name = name.trim().to_string();
        let players = self.state.players.clone();
        self.event_bus.publish(GameEvent::PlayersConfigured { players });
        Ok(())
    }

    /// Moves the player at `from` to position `to`, shifting the others.
    pub fn move_player(&mut self, from: usize, to: usize) -> Result<(), GameError> {
        self.require_step(GameStep::Names)?;
        let len = self.state.players.len();
        for index in [from, to] {
            if index >= len {
                return Err(GameError::PlayerIndexOutOfRange { index });
            }
        }
        if from != to {
            let player = self.state.players.remove(from);
            self.state.players.insert(to, player);
            let players = self.state.players.clone();
            self.event_bus.publish(GameEvent::PlayersConfigured { players });
        }
        Ok(())
    }

    pub fn back_to_setup(&mut self) -> Result<(), GameError> {
        self.require_step(GameStep::Names)?;
        self.step = GameStep::Setup;
        Ok(())
    }

    pub fn set_rules(&mut self, rules: Rules) {
        self.state.rules = rules.clone();
        self.event_bus.publish(GameEvent::RulesChanged { rules });
    }

    pub fn set_player_rule_mode(
        &mut self,
        player_id: &str,
        mode: PlayerRuleMode,
    ) -> Result<(), GameError> {
        if !self.state.players.iter().any(|p| p.id == player_id) {
            return Err(GameError::PlayerNotFound {
                player_id: player_id.to_string(),
            });
        }
        let mut rules = self.state.rules.clone();
        rules.player_modes.insert(player_id.to_string(), mode);
        self.set_rules(rules);
        Ok(())
    }

    /// Enters play with a fresh game id and an empty history.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GameId, GameError> {
        self.require_step(GameStep::Names)?;
        let count = self.state.players.len();
        if count < self.settings.min_players {
            return Err(GameError::NotEnoughPlayers {
                required: self.settings.min_players,
                actual: count,
            });
        }
        if self.corpus.is_loading() {
            return Err(GameError::CorpusLoading);
        }

        let game_id = new_id();
        self.state.turns.clear();
        self.state.turn_index = 0;
        self.state.starting_word = None;
        self.state.game_over = false;
        self.state.winner = None;
        self.state.definitions.clear();
        self.step = GameStep::Play;
        self.game_id = Some(game_id.clone());

        info!("Game {} started with {} players", game_id, count);
        self.event_bus.publish(GameEvent::GameStarted {
            game_id: game_id.clone(),
        });
        self.ensure_starting_word(rng);
        Ok(game_id)
    }

    /// Picks the starting word once play has begun and the corpus is ready.
    /// Stays unset when the corpus is empty, which blocks play.
    pub fn ensure_starting_word<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&str> {
        if self.step != GameStep::Play
            || self.state.starting_word.is_some()
            || self.corpus.is_loading()
        {
            return self.state.starting_word.as_deref();
        }

        let Some(word) = self.choose_starting_word(rng) else {
            warn!("Corpus is empty; no starting word available");
            return None;
        };

        debug!("Starting word: {}", word);
        self.state.starting_word = Some(word.clone());
        if let Some(game_id) = self.game_id.clone() {
            self.event_bus.publish(GameEvent::StartingWordChosen { game_id, word });
        }
        self.state.starting_word.as_deref()
    }

    fn choose_starting_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        for _ in 0..self.settings.starting_word_attempts {
            let candidate = self.corpus.sample_word(rng)?;
            if RuleEngine::passes(candidate, &self.state.rules, None) {
                return Some(candidate.to_string());
            }
        }
        self.corpus.sample_word(rng).map(str::to_string)
    }

    /// Corpus words the player could legally play right now.
    pub fn legal_candidates(&self, player_id: Option<&str>) -> Vec<&str> {
        let Some(letter) = self.required_letter() else {
            return Vec::new();
        };
        let used = self.state.used_words();
        self.corpus
            .words_starting_with(letter)
            .iter()
            .map(String::as_str)
            .filter(|word| !used.contains(*word))
            .filter(|word| RuleEngine::passes(word, &self.state.rules, player_id))
            .collect()
    }

    /// Plays a human's word for the player on turn.
    ///
    /// Words missing from the corpus are checked with `validator` before the
    /// used-word and rule checks run.
    pub async fn submit(
        &mut self,
        raw_input: &str,
        validator: &dyn WordValidator,
    ) -> Result<Turn, SubmitError> {
        if !self.is_running() {
            return Err(SubmitError::GameNotRunning);
        }
        let required = self.required_letter().ok_or(SubmitError::GameNotRunning)?;
        let player = self
            .state
            .current_player()
            .cloned()
            .ok_or(SubmitError::GameNotRunning)?;
        if player.is_bot {
            return Err(SubmitError::NotHumanTurn {
                player: player.name,
            });
        }

        let word = normalize_word(raw_input);
        if word.is_empty() {
            return Err(SubmitError::EmptyWord);
        }
        if !word.starts_with(required) {
            return Err(SubmitError::WrongStartLetter { required });
        }
        if !self.corpus.contains(&word) {
            debug!("'{}' not in corpus, checking online", word);
            if !validator.validate(&word).await {
                return Err(SubmitError::NotInDictionary { word });
            }
        }
        if self.state.is_used(&word) {
            return Err(SubmitError::AlreadyUsed { word });
        }
        if let Some(reason) = RuleEngine::explain(&word, &self.state.rules, Some(&player.id)) {
            return Err(SubmitError::RuleViolation { reason });
        }

        Ok(self.append_turn(&player, word, false))
    }

    /// Moves for the bot on turn. `None` when it is not a bot's turn to play.
    pub fn play_bot_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<BotTurn> {
        if !self.bot_to_move() {
            return None;
        }
        let player = self.state.current_player()?.clone();

        match RandomBot::select_move(self, rng) {
            Some(word) => Some(BotTurn::Played(self.append_turn(&player, word, true))),
            None => {
                info!(
                    "{} has no legal word starting with {:?}",
                    player.name,
                    self.required_letter()
                );
                let winner = self.end_game();
                Some(BotTurn::Stuck { winner })
            }
        }
    }

    fn append_turn(&mut self, player: &Player, word: String, by_bot: bool) -> Turn {
        let turn = Turn::new(player, word);
        debug!("{} played '{}'", turn.player_name, turn.word);
        self.state.turns.push(turn.clone());
        self.advance_turn();

        if let Some(game_id) = self.game_id.clone() {
            self.event_bus.publish(GameEvent::TurnPlayed {
                game_id,
                turn: turn.clone(),
                by_bot,
            });
        }
        turn
    }

    fn advance_turn(&mut self) {
        let count = self.state.players.len();
        if count > 0 {
            self.state.turn_index = (self.state.turn_index + 1) % count;
        }
    }

    /// Ends the game; the winner is whoever played the last word.
    pub fn end_game(&mut self) -> Option<String> {
        let winner = self.state.turns.last().map(|t| t.player_name.clone());
        self.state.game_over = true;
        self.state.winner = winner.clone();

        info!("Game over, winner: {}", winner.as_deref().unwrap_or("none"));
        if let Some(game_id) = self.game_id.clone() {
            self.event_bus.publish(GameEvent::GameOver {
                game_id,
                winner: winner.clone(),
            });
        }
        winner
    }

    /// Back to setup, dropping players and history. Saved games are untouched.
    pub fn reset(&mut self) {
        let rules = std::mem::take(&mut self.state.rules);
        self.state = GameState {
            rules,
            ..GameState::default()
        };
        self.step = GameStep::Setup;
        self.game_id = None;
        self.event_bus.publish(GameEvent::GameReset);
    }

    /// Restores a saved game and continues playing it under the saved id.
    pub fn resume<R: Rng + ?Sized>(
        &mut self,
        saved: &SavedGame,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let count = saved.players.len();
        if count < self.settings.min_players {
            return Err(GameError::NotEnoughPlayers {
                required: self.settings.min_players,
                actual: count,
            });
        }

        let mut state = saved.to_state();
        state.turn_index %= count;
        self.state = state;
        self.step = GameStep::Play;
        self.game_id = Some(saved.id.clone());

        info!("Resumed game {} at turn {}", saved.id, saved.turns.len());
        self.event_bus.publish(GameEvent::GameResumed {
            game_id: saved.id.clone(),
        });
        self.ensure_starting_word(rng);
        Ok(())
    }

    pub fn needs_definition(&self, word: &str) -> bool {
        !self.state.definitions.contains_key(word)
    }

    /// Stores a fetched definition. Records are never replaced once present.
    pub fn record_definition(&mut self, word: &str, record: DefinitionRecord) -> bool {
        if !self.needs_definition(word) {
            return false;
        }
        self.state.definitions.insert(word.to_string(), record);
        if let Some(game_id) = self.game_id.clone() {
            self.event_bus.publish(GameEvent::DefinitionAdded {
                game_id,
                word: word.to_string(),
            });
        }
        true
    }

    /// Snapshot for persistence; `None` outside of play.
    pub fn snapshot(&self, saved_at: i64) -> Option<SavedGame> {
        if self.step != GameStep::Play {
            return None;
        }
        let game_id = self.game_id.clone()?;
        Some(SavedGame::from_state(game_id, saved_at, &self.state))
    }

    fn require_step(&self, expected: GameStep) -> Result<(), GameError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(GameError::InvalidStep {
                current_step: self.step.to_string(),
            })
        }
    }
}
