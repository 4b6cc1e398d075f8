//! Line commands for the terminal front end. Lines starting with `/` are
//! commands; anything else is a word to play.

use std::path::PathBuf;

use thiserror::Error;

use game_types::{ContainMode, EndMode, LengthMode, Player, PlayerRuleMode, Rules};

pub const HELP: &str = "\
Commands:
  /new <humans> <bots>        set up players
  /name <n> <name>            rename player n
  /move <from> <to>           reorder players
  /back                       return to player counts
  /rule end must|not <x>      word must (not) end with x
  /rule length must|not <n>   word must (not) be n letters
  /rule contain must|not <x>  word must (not) contain x
  /rule end|length|contain off
  /rule perplayer on|off      enable per-player overrides
  /rule ignore|global <n>     override rules for player n
  /start                      begin play
  <word>                      play a word
  /end                        end the game
  /saves                      list saved games
  /resume <id>                continue a saved game
  /delete <id>                delete a saved game
  /title <id> [text]          set or clear a title
  /export <id> [dir]          write a .wordtrain file
  /import <path>              load a .wordtrain file
  /theme                      toggle light/dark
  /reset                      start over
  /help
  /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New { humans: usize, bots: usize },
    /// Positions are 1-based, as shown to the user.
    Name { position: usize, name: String },
    Move { from: usize, to: usize },
    Back,
    Rule(RuleCommand),
    Start,
    Play(String),
    End,
    Saves,
    Resume(String),
    Delete(String),
    Title { id: String, title: Option<String> },
    Export { id: String, dir: Option<PathBuf> },
    Import(PathBuf),
    Theme,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleCommand {
    End(Option<(EndMode, String)>),
    Length(Option<(LengthMode, u32)>),
    Contain(Option<(ContainMode, String)>),
    PerPlayer(bool),
    PlayerMode { position: usize, mode: PlayerRuleMode },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Not a number: {0}")]
    InvalidNumber(String),
    #[error("No player at position {0}")]
    NoSuchPlayer(usize),
}

fn number<T: std::str::FromStr>(raw: Option<&str>, usage: &'static str) -> Result<T, CommandError> {
    let raw = raw.ok_or(CommandError::Usage(usage))?;
    raw.parse()
        .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
}

/// `must` / `not` switch shared by the rule commands.
fn must(raw: Option<&str>, usage: &'static str) -> Result<bool, CommandError> {
    match raw {
        Some("must") => Ok(true),
        Some("not") => Ok(false),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_rule(args: &[&str]) -> Result<RuleCommand, CommandError> {
    const END: &str = "/rule end must|not <letter> | /rule end off";
    const LENGTH: &str = "/rule length must|not <n> | /rule length off";
    const CONTAIN: &str = "/rule contain must|not <letter> | /rule contain off";
    const PER_PLAYER: &str = "/rule perplayer on|off";
    const OVERRIDE: &str = "/rule ignore|global <player>";

    let off = args.get(1) == Some(&"off");
    match args.first().copied() {
        Some("end") if off => Ok(RuleCommand::End(None)),
        Some("end") => {
            let mode = if must(args.get(1).copied(), END)? {
                EndMode::MustEnd
            } else {
                EndMode::MustNotEnd
            };
            let letter = args.get(2).ok_or(CommandError::Usage(END))?;
            Ok(RuleCommand::End(Some((mode, letter.to_string()))))
        }
        Some("length") if off => Ok(RuleCommand::Length(None)),
        Some("length") => {
            let mode = if must(args.get(1).copied(), LENGTH)? {
                LengthMode::MustBe
            } else {
                LengthMode::MustNotBe
            };
            let value = number(args.get(2).copied(), LENGTH)?;
            Ok(RuleCommand::Length(Some((mode, value))))
        }
        Some("contain") if off => Ok(RuleCommand::Contain(None)),
        Some("contain") => {
            let mode = if must(args.get(1).copied(), CONTAIN)? {
                ContainMode::MustContain
            } else {
                ContainMode::MustNotContain
            };
            let letter = args.get(2).ok_or(CommandError::Usage(CONTAIN))?;
            Ok(RuleCommand::Contain(Some((mode, letter.to_string()))))
        }
        Some("perplayer") => match args.get(1).copied() {
            Some("on") => Ok(RuleCommand::PerPlayer(true)),
            Some("off") => Ok(RuleCommand::PerPlayer(false)),
            _ => Err(CommandError::Usage(PER_PLAYER)),
        },
        Some(kind @ ("ignore" | "global")) => {
            let position = number(args.get(1).copied(), OVERRIDE)?;
            let mode = if kind == "ignore" {
                PlayerRuleMode::Ignore
            } else {
                PlayerRuleMode::Global
            };
            Ok(RuleCommand::PlayerMode { position, mode })
        }
        _ => Err(CommandError::Usage("/rule end|length|contain|perplayer|ignore|global ...")),
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Play(line.to_string())));
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let tail = parts.next().unwrap_or_default().trim();
    let args: Vec<&str> = tail.split_whitespace().collect();
    let first = args.first().copied();

    let command = match name.as_str() {
        "new" => Command::New {
            humans: number(first, "/new <humans> <bots>")?,
            bots: number(args.get(1).copied(), "/new <humans> <bots>")?,
        },
        "name" => {
            let position = number(first, "/name <n> <name>")?;
            let name = tail
                .split_once(char::is_whitespace)
                .map(|(_, name)| name.trim())
                .filter(|name| !name.is_empty())
                .ok_or(CommandError::Usage("/name <n> <name>"))?;
            Command::Name {
                position,
                name: name.to_string(),
            }
        }
        "move" => Command::Move {
            from: number(first, "/move <from> <to>")?,
            to: number(args.get(1).copied(), "/move <from> <to>")?,
        },
        "back" => Command::Back,
        "rule" => Command::Rule(parse_rule(&args)?),
        "start" => Command::Start,
        "end" => Command::End,
        "saves" => Command::Saves,
        "resume" => Command::Resume(first.ok_or(CommandError::Usage("/resume <id>"))?.to_string()),
        "delete" => Command::Delete(first.ok_or(CommandError::Usage("/delete <id>"))?.to_string()),
        "title" => {
            let id = first.ok_or(CommandError::Usage("/title <id> [text]"))?;
            let title = tail
                .split_once(char::is_whitespace)
                .map(|(_, title)| title.trim().to_string())
                .filter(|title| !title.is_empty());
            Command::Title {
                id: id.to_string(),
                title,
            }
        }
        "export" => Command::Export {
            id: first.ok_or(CommandError::Usage("/export <id> [dir]"))?.to_string(),
            dir: args.get(1).map(PathBuf::from),
        },
        "import" => {
            if tail.is_empty() {
                return Err(CommandError::Usage("/import <path>"));
            }
            Command::Import(PathBuf::from(tail))
        }
        "theme" => Command::Theme,
        "reset" => Command::Reset,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Applies a rule command to a copy of `rules`. Player positions are 1-based.
pub fn apply_rule(
    rules: &Rules,
    players: &[Player],
    command: &RuleCommand,
) -> Result<Rules, CommandError> {
    let mut rules = rules.clone();
    match command {
        RuleCommand::End(setting) => {
            rules.end.enabled = setting.is_some();
            if let Some((mode, letter)) = setting {
                rules.end.mode = *mode;
                rules.end.letter = letter.clone();
            }
        }
        RuleCommand::Length(setting) => {
            rules.length.enabled = setting.is_some();
            if let Some((mode, value)) = setting {
                rules.length.mode = *mode;
                rules.length.value = Some(*value);
            }
        }
        RuleCommand::Contain(setting) => {
            rules.contain.enabled = setting.is_some();
            if let Some((mode, letter)) = setting {
                rules.contain.mode = *mode;
                rules.contain.letter = letter.clone();
            }
        }
        RuleCommand::PerPlayer(enabled) => rules.per_player = *enabled,
        RuleCommand::PlayerMode { position, mode } => {
            let player = player_at(players, *position)?;
            rules.player_modes.insert(player.id.clone(), *mode);
        }
    }
    Ok(rules)
}

/// Index of the player at a 1-based `position`.
pub fn player_index(players: &[Player], position: usize) -> Result<usize, CommandError> {
    position
        .checked_sub(1)
        .filter(|&index| index < players.len())
        .ok_or(CommandError::NoSuchPlayer(position))
}

pub fn player_at(players: &[Player], position: usize) -> Result<&Player, CommandError> {
    player_index(players, position).map(|index| &players[index])
}
