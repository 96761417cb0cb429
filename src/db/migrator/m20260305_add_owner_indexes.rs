use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_anime_entries_owner_status")
                    .table(AnimeEntries::Table)
                    .col(AnimeEntries::OwnerId)
                    .col(AnimeEntries::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_collections_owner")
                    .table(Collections::Table)
                    .col(Collections::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_collections_owner")
                    .table(Collections::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_anime_entries_owner_status")
                    .table(AnimeEntries::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum AnimeEntries {
    Table,
    OwnerId,
    Status,
}

#[derive(DeriveIden)]
enum Collections {
    Table,
    OwnerId,
}
