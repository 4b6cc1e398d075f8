use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EndMode {
    #[default]
    MustEnd,
    MustNotEnd,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LengthMode {
    #[default]
    MustBe,
    MustNotBe,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ContainMode {
    #[default]
    MustContain,
    MustNotContain,
}

/// Whether the global rules apply to a given player when per-player mode is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PlayerRuleMode {
    #[default]
    Global,
    Ignore,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EndRule {
    pub enabled: bool,
    pub mode: EndMode,
    /// Only the first character is significant; empty means unconstrained.
    pub letter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LengthRule {
    pub enabled: bool,
    pub mode: LengthMode,
    pub value: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContainRule {
    pub enabled: bool,
    pub mode: ContainMode,
    pub letter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Rules {
    #[serde(default)]
    pub per_player: bool,
    #[serde(default)]
    pub player_modes: BTreeMap<PlayerId, PlayerRuleMode>,
    #[serde(default)]
    pub end: EndRule,
    #[serde(default)]
    pub length: LengthRule,
    #[serde(default)]
    pub contain: ContainRule,
}

impl Rules {
    /// Override for a player, `Global` when none was set.
    pub fn mode_for(&self, player_id: &str) -> PlayerRuleMode {
        self.player_modes
            .get(player_id)
            .copied()
            .unwrap_or_default()
    }
}
