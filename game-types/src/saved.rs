use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DefinitionRecord, GameId, GameState, Player, Rules, Turn};

/// A stored snapshot of a game. The JSON shape doubles as the export format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SavedGame {
    pub id: GameId,
    /// Milliseconds since the Unix epoch.
    #[ts(type = "number")]
    pub saved_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub title: Option<String>,
    pub players: Vec<Player>,
    pub turns: Vec<Turn>,
    pub starting_word: Option<String>,
    pub turn_index: usize,
    #[serde(default)]
    pub defs_by_word: BTreeMap<String, DefinitionRecord>,
    #[serde(default)]
    pub rules: Rules,
}

impl SavedGame {
    pub fn from_state(id: GameId, saved_at: i64, state: &GameState) -> Self {
        Self {
            id,
            saved_at,
            title: None,
            players: state.players.clone(),
            turns: state.turns.clone(),
            starting_word: state.starting_word.clone(),
            turn_index: state.turn_index,
            defs_by_word: state.definitions.clone(),
            rules: state.rules.clone(),
        }
    }

    /// Rebuilds a running game state; game-over and winner are never persisted.
    pub fn to_state(&self) -> GameState {
        GameState {
            players: self.players.clone(),
            turns: self.turns.clone(),
            starting_word: self.starting_word.clone(),
            turn_index: self.turn_index,
            game_over: false,
            winner: None,
            rules: self.rules.clone(),
            definitions: self.defs_by_word.clone(),
        }
    }

    /// Short label for listings.
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => {
                let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
                format!("{} ({} words)", names.join(", "), self.turns.len())
            }
        }
    }
}
