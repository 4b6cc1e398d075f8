//! Portable text export of a saved game: base64 (standard alphabet) over the
//! UTF-8 JSON form of [`SavedGame`].

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use game_types::{new_id, DefinitionRecord, Player, Rules, SavedGame, Turn};

use crate::SavedGameRepository;

pub const EXPORT_EXTENSION: &str = "wordtrain";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("Import is not valid UTF-8 text")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Import is not a saved game: {0}")]
    Json(#[from] serde_json::Error),
}

/// The import side is lenient: everything but the JSON object itself may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ImportDocument {
    id: Option<String>,
    title: Option<String>,
    players: Vec<Player>,
    turns: Vec<Turn>,
    starting_word: Option<String>,
    turn_index: usize,
    defs_by_word: BTreeMap<String, DefinitionRecord>,
    rules: Rules,
}

pub fn export_file_name(id: &str) -> String {
    format!("wordtrain-{id}.{EXPORT_EXTENSION}")
}

pub fn encode_export(saved: &SavedGame) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(saved)?;
    Ok(STANDARD.encode(json))
}

/// Decodes an exported blob. A missing or empty id gets a fresh one and
/// `saved_at` is always stamped with `now`.
pub fn decode_import(blob: &str, now: i64) -> Result<SavedGame, ImportError> {
    let bytes = STANDARD.decode(blob.trim())?;
    let json = String::from_utf8(bytes)?;
    let doc: ImportDocument = serde_json::from_str(&json)?;

    let id = doc
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(new_id);

    Ok(SavedGame {
        id,
        saved_at: now,
        title: doc.title.filter(|t| !t.trim().is_empty()),
        players: doc.players,
        turns: doc.turns,
        starting_word: doc.starting_word,
        turn_index: doc.turn_index,
        defs_by_word: doc.defs_by_word,
        rules: doc.rules,
    })
}

/// Decodes and stores an exported blob. Nothing is written when decoding fails.
pub async fn import_blob(repo: &SavedGameRepository, blob: &str) -> Result<SavedGame> {
    let saved = match decode_import(blob, crate::now_millis()) {
        Ok(saved) => saved,
        Err(e) => {
            warn!("Rejected import: {}", e);
            return Err(e.into());
        }
    };

    repo.upsert(&saved).await?;
    info!("Imported saved game {}", saved.id);
    Ok(saved)
}

/// Writes the export into `dir` under its canonical file name and returns the full path.
pub async fn write_export_file(dir: &Path, saved: &SavedGame) -> Result<std::path::PathBuf> {
    let path = dir.join(export_file_name(&saved.id));
    let blob = encode_export(saved)?;
    tokio::fs::write(&path, blob)
        .await
        .with_context(|| format!("Failed to write export to {}", path.display()))?;
    Ok(path)
}

pub async fn read_export_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read import from {}", path.display()))
}
