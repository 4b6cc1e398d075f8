use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Player, Rules, Turn};

/// Most definitions kept per word.
pub const MAX_DEFINITIONS: usize = 3;

/// Lowercases a word and strips everything that is not a letter.
pub fn normalize_word(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum GameStep {
    #[default]
    Setup,
    Names,
    Play,
}

impl std::fmt::Display for GameStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStep::Setup => write!(f, "setup"),
            GameStep::Names => write!(f, "names"),
            GameStep::Play => write!(f, "play"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DefinitionSource {
    #[serde(rename = "dictionaryapi.dev")]
    DictionaryApiDev,
    #[serde(rename = "freedictionaryapi.com")]
    FreeDictionaryApi,
    #[serde(rename = "wiktionary")]
    Wiktionary,
}

impl std::fmt::Display for DefinitionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefinitionSource::DictionaryApiDev => write!(f, "dictionaryapi.dev"),
            DefinitionSource::FreeDictionaryApi => write!(f, "freedictionaryapi.com"),
            DefinitionSource::Wiktionary => write!(f, "wiktionary"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DefinitionRecord {
    pub defs: Vec<String>,
    pub source: DefinitionSource,
}

impl DefinitionRecord {
    /// Builds a record from raw definitions, keeping the first non-blank few.
    /// Returns `None` when nothing usable remains.
    pub fn from_defs<I, S>(defs: I, source: DefinitionSource) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let defs: Vec<String> = defs
            .into_iter()
            .map(Into::into)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .take(MAX_DEFINITIONS)
            .collect();

        if defs.is_empty() {
            None
        } else {
            Some(Self { defs, source })
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameState {
    pub players: Vec<Player>,
    pub turns: Vec<Turn>,
    pub starting_word: Option<String>,
    pub turn_index: usize,
    pub game_over: bool,
    pub winner: Option<String>,
    pub rules: Rules,
    pub definitions: BTreeMap<String, DefinitionRecord>,
}

impl GameState {
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.turn_index)
    }

    /// The most recently played word, or the starting word before any turn.
    pub fn last_word(&self) -> Option<&str> {
        self.turns
            .last()
            .map(|turn| turn.word.as_str())
            .or(self.starting_word.as_deref())
    }

    /// The letter the next word has to start with.
    pub fn required_letter(&self) -> Option<char> {
        self.last_word().and_then(|word| word.chars().last())
    }

    /// Starting word plus every played word, normalized.
    pub fn used_words(&self) -> BTreeSet<String> {
        self.turns
            .iter()
            .map(|turn| normalize_word(&turn.word))
            .chain(self.starting_word.iter().map(|w| normalize_word(w)))
            .collect()
    }

    pub fn is_used(&self, word: &str) -> bool {
        let word = normalize_word(word);
        self.starting_word
            .as_deref()
            .is_some_and(|start| normalize_word(start) == word)
            || self
                .turns
                .iter()
                .any(|turn| normalize_word(&turn.word) == word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(start: Option<&str>, words: &[&str]) -> GameState {
        let p1 = Player::human("P1");
        let p2 = Player::human("P2");
        let turns = words
            .iter()
            .enumerate()
            .map(|(i, w)| Turn::new(if i % 2 == 0 { &p1 } else { &p2 }, *w))
            .collect();
        GameState {
            players: vec![p1, p2],
            turns,
            starting_word: start.map(str::to_string),
            ..GameState::default()
        }
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Tiger! "), "tiger");
        assert_eq!(normalize_word("rock-n-roll"), "rocknroll");
        assert_eq!(normalize_word("123"), "");
        assert_eq!(normalize_word(""), "");
    }

    #[test]
    fn test_required_letter_follows_last_word() {
        assert_eq!(state_with(None, &[]).required_letter(), None);
        assert_eq!(state_with(Some("cat"), &[]).required_letter(), Some('t'));
        assert_eq!(
            state_with(Some("cat"), &["tiger", "rabbit"]).required_letter(),
            Some('t')
        );
        assert_eq!(state_with(Some("cat"), &["tiger"]).required_letter(), Some('r'));
    }

    #[test]
    fn test_used_words_include_starting_word() {
        let state = state_with(Some("cat"), &["tiger"]);
        assert!(state.is_used("cat"));
        assert!(state.is_used("TIGER"));
        assert!(!state.is_used("rabbit"));
        assert_eq!(state.used_words().len(), 2);
    }

    #[test]
    fn test_definition_record_trims_and_caps() {
        let record = DefinitionRecord::from_defs(
            ["  one ", "", "two", "three", "four"],
            DefinitionSource::DictionaryApiDev,
        )
        .unwrap();
        assert_eq!(record.defs, vec!["one", "two", "three"]);

        assert!(DefinitionRecord::from_defs(["  "], DefinitionSource::Wiktionary).is_none());
    }

    #[test]
    fn test_definition_source_tags() {
        let json = serde_json::to_string(&DefinitionSource::FreeDictionaryApi).unwrap();
        assert_eq!(json, "\"freedictionaryapi.com\"");
        let parsed: DefinitionSource = serde_json::from_str("\"wiktionary\"").unwrap();
        assert_eq!(parsed, DefinitionSource::Wiktionary);
    }
}
