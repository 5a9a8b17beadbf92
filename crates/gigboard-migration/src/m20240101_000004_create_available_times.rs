use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_artists::Artists;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AvailableTimes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AvailableTimes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AvailableTimes::ArtistId).uuid().not_null())
                    .col(
                        ColumnDef::new(AvailableTimes::DayOfWeek)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(AvailableTimes::StartTime).time().not_null())
                    .col(ColumnDef::new(AvailableTimes::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(AvailableTimes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_available_times_artist_id")
                            .from(AvailableTimes::Table, AvailableTimes::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_available_times_artist_id")
                    .table(AvailableTimes::Table)
                    .col(AvailableTimes::ArtistId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AvailableTimes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AvailableTimes {
    Table,
    Id,
    ArtistId,
    DayOfWeek,
    StartTime,
    EndTime,
    CreatedAt,
}
