pub mod connection;
pub mod entities;
pub mod export;
pub mod repositories;

use sea_orm::{DatabaseConnection, DbErr};

pub use export::{
    decode_import, encode_export, export_file_name, import_blob, read_export_file,
    write_export_file, ImportError, EXPORT_EXTENSION,
};
pub use repositories::{SavedGameRepository, DEFAULT_MAX_SAVED_GAMES};

/// Milliseconds since the Unix epoch, the unit `savedAt` is stored in.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct DatabaseManager {
    connection: DatabaseConnection,
}

impl DatabaseManager {
    /// Connects and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, DbErr> {
        let connection = connection::connect_and_migrate(database_url).await?;
        Ok(Self { connection })
    }

    pub async fn in_memory() -> Result<Self, DbErr> {
        let connection = connection::connect_to_memory_database().await?;
        connection::run_migrations(&connection).await?;
        Ok(Self { connection })
    }

    pub fn get_connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn saved_games(&self, capacity: usize) -> SavedGameRepository {
        SavedGameRepository::with_capacity(self.connection.clone(), capacity)
    }
}
