use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{PlayerId, new_id};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_bot: bool,
}

impl Player {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            is_bot: false,
        }
    }

    pub fn bot(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            is_bot: true,
        }
    }
}

/// A played word. The player's name is captured at the time of play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Turn {
    pub player_id: PlayerId,
    pub player_name: String,
    pub word: String,
}

impl Turn {
    pub fn new(player: &Player, word: impl Into<String>) -> Self {
        Self {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            word: word.into(),
        }
    }
}
