use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::debug;

use crate::entities::{prelude::*, saved_games};
use game_types::SavedGame;

pub const DEFAULT_MAX_SAVED_GAMES: usize = 50;

/// Saved games keyed by game id. Writes are upserts, and the table never
/// holds more than `capacity` rows: the oldest by `saved_at` are evicted.
#[derive(Clone)]
pub struct SavedGameRepository {
    db: DatabaseConnection,
    capacity: usize,
}

impl SavedGameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_capacity(db, DEFAULT_MAX_SAVED_GAMES)
    }

    pub fn with_capacity(db: DatabaseConnection, capacity: usize) -> Self {
        Self {
            db,
            capacity: capacity.max(1),
        }
    }

    fn model_to_saved_game(model: saved_games::Model) -> Result<SavedGame> {
        let mut saved: SavedGame = serde_json::from_str(&model.payload)
            .with_context(|| format!("Corrupt payload for saved game {}", model.id))?;
        // Columns win over the payload so title edits and ids stay authoritative
        saved.id = model.id;
        saved.saved_at = model.saved_at;
        saved.title = model.title;
        Ok(saved)
    }

    fn saved_game_to_model(saved: &SavedGame) -> Result<saved_games::ActiveModel> {
        let payload = serde_json::to_string(saved)?;
        Ok(saved_games::ActiveModel {
            id: sea_orm::ActiveValue::Set(saved.id.clone()),
            saved_at: sea_orm::ActiveValue::Set(saved.saved_at),
            title: sea_orm::ActiveValue::Set(saved.title.clone()),
            payload: sea_orm::ActiveValue::Set(payload),
        })
    }

    /// Inserts or replaces the record with the same id, then enforces the cap.
    pub async fn upsert(&self, saved: &SavedGame) -> Result<()> {
        let model = Self::saved_game_to_model(saved)?;

        SavedGames::insert(model)
            .on_conflict(
                OnConflict::column(saved_games::Column::Id)
                    .update_columns([
                        saved_games::Column::SavedAt,
                        saved_games::Column::Title,
                        saved_games::Column::Payload,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        debug!("Saved game {} ({} turns)", saved.id, saved.turns.len());
        self.evict_oldest().await
    }

    async fn evict_oldest(&self) -> Result<()> {
        let total = self.count().await?;
        let excess = total.saturating_sub(self.capacity as u64);
        if excess == 0 {
            return Ok(());
        }

        let overflow: Vec<String> = SavedGames::find()
            .select_only()
            .column(saved_games::Column::Id)
            .order_by_asc(saved_games::Column::SavedAt)
            .order_by_asc(saved_games::Column::Id)
            .limit(excess)
            .into_tuple()
            .all(&self.db)
            .await?;

        let evicted = SavedGames::delete_many()
            .filter(saved_games::Column::Id.is_in(overflow))
            .exec(&self.db)
            .await?;
        debug!("Evicted {} old saved games", evicted.rows_affected);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<SavedGame>> {
        SavedGames::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(Self::model_to_saved_game)
            .transpose()
    }

    /// All saved games, most recently saved first.
    pub async fn list(&self) -> Result<Vec<SavedGame>> {
        let models = SavedGames::find()
            .order_by_desc(saved_games::Column::SavedAt)
            .order_by_desc(saved_games::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::model_to_saved_game).collect()
    }

    /// Returns whether a record was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = SavedGames::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Sets or clears a title; blank titles clear it. Returns whether the game exists.
    pub async fn set_title(&self, id: &str, title: Option<&str>) -> Result<bool> {
        let Some(mut saved) = self.find_by_id(id).await? else {
            return Ok(false);
        };

        saved.title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let model = Self::saved_game_to_model(&saved)?;
        SavedGames::update(model).exec(&self.db).await?;
        Ok(true)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(SavedGames::find().count(&self.db).await?)
    }
}
