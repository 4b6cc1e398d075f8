use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SavedGames::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SavedGames::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(SavedGames::SavedAt).big_integer().not_null())
                    .col(ColumnDef::new(SavedGames::Title).string().null())
                    .col(ColumnDef::new(SavedGames::Payload).text().not_null())
                    .to_owned(),
            )
            .await?;

        // Listing and eviction both order by save time
        manager
            .create_index(
                Index::create()
                    .name("idx_saved_games_saved_at")
                    .table(SavedGames::Table)
                    .col(SavedGames::SavedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavedGames::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SavedGames {
    Table,
    Id,
    SavedAt,
    Title,
    Payload,
}
