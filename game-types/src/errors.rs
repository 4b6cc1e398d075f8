use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Reasons a submitted word is refused. None of them advances the turn.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SubmitError {
    #[error("Enter a word")]
    EmptyWord,
    #[error("Word must start with \"{required}\"")]
    WrongStartLetter { required: char },
    #[error("Not in dictionary (online check failed)")]
    NotInDictionary { word: String },
    #[error("Word already used")]
    AlreadyUsed { word: String },
    #[error("{reason}")]
    RuleViolation { reason: String },
    #[error("No game is running")]
    GameNotRunning,
    #[error("Waiting for {player} to play")]
    NotHumanTurn { player: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("Need at least {required} players, got {actual}")]
    NotEnoughPlayers { required: usize, actual: usize },
    #[error("Dictionary is still loading")]
    CorpusLoading,
    #[error("Not allowed during the {current_step} step")]
    InvalidStep { current_step: String },
    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },
    #[error("No player at position {index}")]
    PlayerIndexOutOfRange { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_error_messages_are_distinct() {
        let errors = [
            SubmitError::EmptyWord,
            SubmitError::WrongStartLetter { required: 't' },
            SubmitError::NotInDictionary {
                word: "xyzzy".to_string(),
            },
            SubmitError::AlreadyUsed {
                word: "tiger".to_string(),
            },
            SubmitError::RuleViolation {
                reason: "Word must end with \"e\"".to_string(),
            },
            SubmitError::GameNotRunning,
        ];
        let messages: std::collections::HashSet<String> =
            errors.iter().map(ToString::to_string).collect();
        assert_eq!(messages.len(), errors.len());
        assert_eq!(
            SubmitError::WrongStartLetter { required: 't' }.to_string(),
            "Word must start with \"t\""
        );
    }
}
