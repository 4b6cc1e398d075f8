use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use game_app::commands::{self, Command, apply_rule, player_at, player_index};
use game_app::providers::{self, default_definitions, default_validator, word_source_for};
use game_app::{Config, GameSession, Services, SessionOptions, render, ui_settings};
use game_persistence::DatabaseManager;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs on stderr, the game itself on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Word Train...");

    let config = Config::new();
    if let Some(theme) = config.theme {
        ui_settings::set_theme(theme);
    }

    let db = DatabaseManager::connect(&config.database_url).await?;
    let client = providers::http_client()?;
    let services = Services {
        validator: Arc::new(default_validator(&client, config.request_timeout())),
        definitions: Arc::new(default_definitions(&client, config.request_timeout())),
    };

    let mut session = GameSession::new(
        services,
        db.saved_games(config.max_saved_games),
        SessionOptions::from_config(&config),
    );
    session.load_corpus(word_source_for(&config.word_list_url, &client));

    println!("Word Train. Type /help for commands.");
    println!("{}", render::status(session.game()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match commands::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => {
                        if let Err(e) = run_command(&mut session, command).await {
                            println!("{e:#}");
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("{e}"),
                }
            }
            Some(event) = session.next_event() => {
                let events = session.handle_event(event).await;
                print_events(&session, &events);
                if !events.is_empty() {
                    println!("{}", render::status(session.game()));
                }
            }
        }
    }

    info!("Goodbye");
    Ok(())
}

fn print_events(session: &GameSession, events: &[game_core::GameEvent]) {
    for event in events {
        if let Some(line) = render::event(session.game(), event) {
            println!("{line}");
        }
    }
}

async fn run_command(session: &mut GameSession, command: Command) -> Result<()> {
    match command {
        Command::New { humans, bots } => {
            session.configure_players(humans, bots).await?;
        }
        Command::Name { position, name } => {
            let id = player_at(&session.game().state.players, position)?.id.clone();
            session.rename_player(&id, &name).await?;
        }
        Command::Move { from, to } => {
            let players = &session.game().state.players;
            let from = player_index(players, from)?;
            let to = player_index(players, to)?;
            session.move_player(from, to).await?;
        }
        Command::Back => session.back_to_setup().await?,
        Command::Rule(rule) => {
            let game = session.game();
            let rules = apply_rule(&game.state.rules, &game.state.players, &rule)?;
            session.set_rules(rules).await;
        }
        Command::Start => {
            let game_id = session.start().await?;
            println!("Game {game_id} started");
        }
        Command::Play(word) => match session.submit(&word).await {
            Ok(turn) => println!("{} played {}", turn.player_name, turn.word),
            Err(e) => println!("{e}"),
        },
        Command::End => {
            if session.end_game().await.is_none() && !session.game().is_over() {
                println!("No game is running");
            }
        }
        Command::Saves => {
            let saved = session.list_saved().await?;
            if saved.is_empty() {
                println!("No saved games");
            }
            for game in &saved {
                println!("{}", render::saved_game(game));
            }
            return Ok(());
        }
        Command::Resume(id) => session.resume(&id).await?,
        Command::Delete(id) => {
            if session.delete_saved(&id).await? {
                println!("Deleted {id}");
            } else {
                println!("No saved game with id {id}");
            }
            return Ok(());
        }
        Command::Title { id, title } => {
            if !session.set_title(&id, title.as_deref()).await? {
                println!("No saved game with id {id}");
            }
            return Ok(());
        }
        Command::Export { id, dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            let path = session.export(&id, &dir).await?;
            println!("Wrote {}", path.display());
            return Ok(());
        }
        Command::Import(path) => match session.import(&path).await {
            Ok(saved) => println!("Imported {}", render::saved_game(&saved)),
            Err(e) => warn!("Import of {} failed: {:#}", path.display(), e),
        },
        Command::Theme => {
            println!("Theme: {}", ui_settings::toggle_theme());
            return Ok(());
        }
        Command::Reset => session.reset().await,
        Command::Help => {
            println!("{}", commands::HELP);
            return Ok(());
        }
        Command::Quit => {}
    }

    println!("{}", render::status(session.game()));
    Ok(())
}
