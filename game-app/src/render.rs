//! Plain-text views of the session for the terminal.

use std::fmt::Write;

use game_core::{Game, GameEvent};
use game_types::{ContainMode, EndMode, GameStep, LengthMode, PlayerRuleMode, Rules, SavedGame};

pub fn players(game: &Game) -> String {
    let mut out = String::new();
    for (i, player) in game.state.players.iter().enumerate() {
        let on_turn = game.is_running() && i == game.state.turn_index;
        let marker = if on_turn { ">" } else { " " };
        let kind = if player.is_bot { " (bot)" } else { "" };
        let ignores = if game.state.rules.per_player
            && game.state.rules.mode_for(&player.id) == PlayerRuleMode::Ignore
        {
            " [ignores rules]"
        } else {
            ""
        };
        let _ = writeln!(out, "{marker} {}. {}{kind}{ignores}", i + 1, player.name);
    }
    out
}

pub fn rules(rules: &Rules) -> String {
    let mut parts = Vec::new();
    if rules.end.enabled && !rules.end.letter.is_empty() {
        let verb = match rules.end.mode {
            EndMode::MustEnd => "must end",
            EndMode::MustNotEnd => "must not end",
        };
        parts.push(format!("{verb} with \"{}\"", rules.end.letter));
    }
    if let (true, Some(n)) = (rules.length.enabled, rules.length.value) {
        let verb = match rules.length.mode {
            LengthMode::MustBe => "must be",
            LengthMode::MustNotBe => "must not be",
        };
        parts.push(format!("{verb} {n} letters"));
    }
    if rules.contain.enabled && !rules.contain.letter.is_empty() {
        let verb = match rules.contain.mode {
            ContainMode::MustContain => "must contain",
            ContainMode::MustNotContain => "must not contain",
        };
        parts.push(format!("{verb} \"{}\"", rules.contain.letter));
    }

    if parts.is_empty() {
        "Rules: none".to_string()
    } else {
        format!("Rules: words {}", parts.join("; "))
    }
}

pub fn status(game: &Game) -> String {
    match game.step() {
        GameStep::Setup => "Choose players with /new <humans> <bots>".to_string(),
        GameStep::Names => format!(
            "{}{}\n/name, /move, /rule, then /start",
            players(game),
            rules(&game.state.rules)
        ),
        GameStep::Play => {
            let mut out = players(game);
            let chain: Vec<&str> = game
                .state
                .starting_word
                .iter()
                .map(String::as_str)
                .chain(game.state.turns.iter().map(|t| t.word.as_str()))
                .collect();
            if game.corpus().is_loading() {
                out.push_str("Loading dictionary...\n");
            } else if chain.is_empty() {
                out.push_str("No starting word available\n");
            } else {
                let _ = writeln!(out, "Chain: {}", chain.join(" -> "));
            }
            if game.is_over() {
                let _ = writeln!(out, "Game over. {}", winner_line(game.state.winner.as_deref()));
            } else if let (Some(letter), Some(player)) =
                (game.required_letter(), game.state.current_player())
            {
                let _ = writeln!(
                    out,
                    "{}'s turn: a word starting with \"{letter}\"",
                    player.name
                );
            }
            out.push_str(&rules(&game.state.rules));
            out
        }
    }
}

fn winner_line(winner: Option<&str>) -> String {
    match winner {
        Some(name) => format!("Winner: {name}"),
        None => "No winner".to_string(),
    }
}

/// One line per event worth telling the user about.
pub fn event(game: &Game, event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::StartingWordChosen { word, .. } => Some(format!("Starting word: {word}")),
        GameEvent::TurnPlayed { turn, by_bot: true, .. } => {
            Some(format!("{} played {}", turn.player_name, turn.word))
        }
        GameEvent::DefinitionAdded { word, .. } => {
            let record = game.state.definitions.get(word)?;
            let mut out = format!("{word} ({}):", record.source);
            for def in &record.defs {
                let _ = write!(out, "\n  - {def}");
            }
            Some(out)
        }
        GameEvent::GameOver { winner, .. } => {
            Some(format!("Game over! {}", winner_line(winner.as_deref())))
        }
        _ => None,
    }
}

pub fn saved_game(saved: &SavedGame) -> String {
    let saved_at = chrono::DateTime::from_timestamp_millis(saved.saved_at)
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown time".to_string());
    format!("{}  {}  {}", saved.id, saved_at, saved.label())
}
