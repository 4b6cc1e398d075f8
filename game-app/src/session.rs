//! Drives a [`Game`] from one place: user commands, the bot timer, network
//! completions and autosave are all handled sequentially on the caller's task.
//!
//! Background work (corpus download, definition lookups, the bot delay) runs
//! in spawned tasks that report back through a [`SessionEvent`] channel. The
//! front end pulls from [`GameSession::next_event`] and hands each event back
//! to [`GameSession::handle_event`], so state only ever changes in one place.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use game_core::{
    DefinitionProvider, Game, GameEvent, GameEventHandler, GameSettings, WordCorpus, WordSource,
    WordValidator,
};
use game_persistence::{
    SavedGameRepository, import_blob, now_millis, read_export_file, write_export_file,
};
use game_types::{
    DefinitionRecord, GameError, GameId, Player, PlayerRuleMode, Rules, SavedGame, SubmitError,
    Turn,
};

use crate::config::Config;

/// Completions of background work, fed back into the session.
#[derive(Debug)]
pub enum SessionEvent {
    CorpusLoaded(WordCorpus),
    BotTimerFired { generation: u64 },
    DefinitionFetched {
        word: String,
        record: Option<DefinitionRecord>,
    },
}

/// Forwards engine events to the session so they can be acted on after the
/// engine call returns.
struct ChannelHandler {
    sender: mpsc::UnboundedSender<GameEvent>,
}

impl GameEventHandler for ChannelHandler {
    fn handle_event(&mut self, event: GameEvent) {
        // The receiver lives as long as the session
        let _ = self.sender.send(event);
    }
}

pub struct Services {
    pub validator: Arc<dyn WordValidator>,
    pub definitions: Arc<dyn DefinitionProvider>,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub bot_delay: Duration,
    pub rng_seed: Option<u64>,
    pub settings: GameSettings,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bot_delay: config.bot_delay(),
            rng_seed: config.rng_seed,
            settings: GameSettings::default(),
        }
    }
}

pub struct GameSession {
    game: Game,
    rng: ChaCha8Rng,
    services: Services,
    saved_games: SavedGameRepository,
    bot_delay: Duration,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    game_events: mpsc::UnboundedReceiver<GameEvent>,
    bot_timer: Option<JoinHandle<()>>,
    bot_generation: u64,
    pending_definitions: HashSet<String>,
    /// Title of the game in play, carried into every autosave.
    title: Option<String>,
}

impl GameSession {
    pub fn new(
        services: Services,
        saved_games: SavedGameRepository,
        options: SessionOptions,
    ) -> Self {
        let mut game = Game::with_settings(WordCorpus::loading(), options.settings);
        let (game_tx, game_events) = mpsc::unbounded_channel();
        game.event_bus.add_handler(Box::new(ChannelHandler { sender: game_tx }));

        let rng = match options.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            game,
            rng,
            services,
            saved_games,
            bot_delay: options.bot_delay,
            events_tx,
            events_rx,
            game_events,
            bot_timer: None,
            bot_generation: 0,
            pending_definitions: HashSet::new(),
            title: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn saved_games(&self) -> &SavedGameRepository {
        &self.saved_games
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn bot_pending(&self) -> bool {
        self.bot_timer.is_some()
    }

    /// Starts downloading the corpus; it arrives later as [`SessionEvent::CorpusLoaded`].
    pub fn load_corpus(&self, source: Arc<dyn WordSource>) {
        let sender = self.events_tx.clone();
        tokio::spawn(async move {
            let corpus = game_core::load_corpus(source.as_ref()).await;
            let _ = sender.send(SessionEvent::CorpusLoaded(corpus));
        });
    }

    /// Waits for the next background completion.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Applies a background completion and returns the engine events it caused.
    pub async fn handle_event(&mut self, event: SessionEvent) -> Vec<GameEvent> {
        match event {
            SessionEvent::CorpusLoaded(corpus) => {
                self.game.set_corpus(corpus, &mut self.rng);
            }
            SessionEvent::BotTimerFired { generation } => {
                if generation != self.bot_generation {
                    debug!("Ignoring stale bot timer {}", generation);
                    return Vec::new();
                }
                self.bot_timer = None;
                self.game.play_bot_turn(&mut self.rng);
            }
            SessionEvent::DefinitionFetched { word, record } => {
                self.pending_definitions.remove(&word);
                match record {
                    Some(record) => {
                        self.game.record_definition(&word, record);
                    }
                    None => debug!("No definition found for '{}'", word),
                }
            }
        }
        self.settle().await
    }

    pub async fn configure_players(
        &mut self,
        humans: usize,
        bots: usize,
    ) -> Result<Vec<Player>, GameError> {
        let players = self.game.configure_players(humans, bots)?.to_vec();
        self.settle().await;
        Ok(players)
    }

    pub async fn rename_player(&mut self, player_id: &str, name: &str) -> Result<(), GameError> {
        self.game.rename_player(player_id, name)?;
        self.settle().await;
        Ok(())
    }

    pub async fn move_player(&mut self, from: usize, to: usize) -> Result<(), GameError> {
        self.game.move_player(from, to)?;
        self.settle().await;
        Ok(())
    }

    pub async fn back_to_setup(&mut self) -> Result<(), GameError> {
        self.game.back_to_setup()?;
        self.settle().await;
        Ok(())
    }

    pub async fn set_rules(&mut self, rules: Rules) {
        self.game.set_rules(rules);
        self.settle().await;
    }

    pub async fn set_player_rule_mode(
        &mut self,
        player_id: &str,
        mode: PlayerRuleMode,
    ) -> Result<(), GameError> {
        self.game.set_player_rule_mode(player_id, mode)?;
        self.settle().await;
        Ok(())
    }

    pub async fn start(&mut self) -> Result<GameId, GameError> {
        self.cancel_bot_timer();
        let game_id = self.game.start(&mut self.rng)?;
        self.title = None;
        self.settle().await;
        Ok(game_id)
    }

    pub async fn submit(&mut self, raw: &str) -> Result<Turn, SubmitError> {
        let validator = self.services.validator.clone();
        let result = self.game.submit(raw, validator.as_ref()).await;
        self.settle().await;
        result
    }

    /// Ends a running game early; the last player to place a word wins.
    pub async fn end_game(&mut self) -> Option<String> {
        if !self.game.is_running() {
            return None;
        }
        let winner = self.game.end_game();
        self.settle().await;
        winner
    }

    pub async fn reset(&mut self) {
        self.cancel_bot_timer();
        self.pending_definitions.clear();
        self.title = None;
        self.game.reset();
        self.settle().await;
    }

    pub async fn resume(&mut self, id: &str) -> Result<()> {
        let saved = self
            .saved_games
            .find_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("No saved game with id {id}"))?;

        self.cancel_bot_timer();
        self.game.resume(&saved, &mut self.rng)?;
        self.title = saved.title.clone();

        let missing: Vec<String> = saved
            .starting_word
            .iter()
            .chain(saved.turns.iter().map(|t| &t.word))
            .filter(|word| self.game.needs_definition(word))
            .cloned()
            .collect();
        for word in missing {
            self.request_definition(&word);
        }

        self.settle().await;
        Ok(())
    }

    pub async fn list_saved(&self) -> Result<Vec<SavedGame>> {
        self.saved_games.list().await
    }

    pub async fn delete_saved(&self, id: &str) -> Result<bool> {
        self.saved_games.delete(id).await
    }

    pub async fn set_title(&mut self, id: &str, title: Option<&str>) -> Result<bool> {
        let found = self.saved_games.set_title(id, title).await?;
        if found && self.game.game_id().is_some_and(|current| current == id) {
            self.title = self.saved_games.find_by_id(id).await?.and_then(|g| g.title);
        }
        Ok(found)
    }

    /// Writes a saved game to `dir` and returns the file path.
    pub async fn export(&self, id: &str, dir: &Path) -> Result<PathBuf> {
        let saved = self
            .saved_games
            .find_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("No saved game with id {id}"))?;
        let path = write_export_file(dir, &saved).await?;
        info!("Exported game {} to {}", id, path.display());
        Ok(path)
    }

    pub async fn import(&self, path: &Path) -> Result<SavedGame> {
        let blob = read_export_file(path).await?;
        import_blob(&self.saved_games, &blob).await
    }

    /// Reacts to the engine events raised by the last call: definition
    /// lookups, autosave and the bot timer.
    async fn settle(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.game_events.try_recv() {
            if let Some(word) = event.new_word() {
                let word = word.to_string();
                self.request_definition(&word);
            }
            events.push(event);
        }

        self.schedule_bot();

        if !events.is_empty() && self.game.is_running() {
            if let Err(e) = self.autosave().await {
                error!("Autosave failed: {:#}", e);
            }
        }
        events
    }

    async fn autosave(&self) -> Result<()> {
        let Some(mut snapshot) = self.game.snapshot(now_millis()) else {
            return Ok(());
        };
        snapshot.title = self.title.clone();
        self.saved_games.upsert(&snapshot).await
    }

    fn request_definition(&mut self, word: &str) {
        if !self.game.needs_definition(word) || !self.pending_definitions.insert(word.to_string()) {
            return;
        }

        let provider = self.services.definitions.clone();
        let sender = self.events_tx.clone();
        let word = word.to_string();
        tokio::spawn(async move {
            let record = provider.lookup(&word).await;
            let _ = sender.send(SessionEvent::DefinitionFetched { word, record });
        });
    }

    fn schedule_bot(&mut self) {
        if !self.game.bot_to_move() {
            self.cancel_bot_timer();
            return;
        }
        if self.bot_timer.is_some() {
            return;
        }

        self.bot_generation += 1;
        let generation = self.bot_generation;
        let delay = self.bot_delay;
        let sender = self.events_tx.clone();
        self.bot_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(SessionEvent::BotTimerFired { generation });
        }));
    }

    fn cancel_bot_timer(&mut self) {
        if let Some(timer) = self.bot_timer.take() {
            timer.abort();
        }
        // A fire already queued in the channel must not count either
        self.bot_generation += 1;
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        if let Some(timer) = self.bot_timer.take() {
            timer.abort();
        }
    }
}
