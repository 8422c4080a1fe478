//! Create `tires_catalog` table. Timestamps are epoch milliseconds.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TiresCatalog::Table)
                    .if_not_exists()
                    .col(pk_auto(TiresCatalog::Id))
                    .col(string_len(TiresCatalog::Brand, 100))
                    .col(string_len(TiresCatalog::Model, 100))
                    .col(string_len(TiresCatalog::Size, 50))
                    .col(string_len_null(TiresCatalog::LayerIndex, 50))
                    .col(integer_null(TiresCatalog::Layers))
                    .col(integer_null(TiresCatalog::MaxPressure))
                    .col(integer_null(TiresCatalog::MinPressure))
                    .col(integer_null(TiresCatalog::MaxDepth))
                    .col(integer_null(TiresCatalog::MinDepth))
                    .col(string_len_null(TiresCatalog::WearType, 50))
                    .col(integer_null(TiresCatalog::Profitability))
                    .col(integer_null(TiresCatalog::Performance))
                    .col(string_len_null(TiresCatalog::Temperature, 50))
                    .col(string_len_null(TiresCatalog::Speed, 50))
                    .col(integer_null(TiresCatalog::SpeedNumber))
                    .col(string_len_null(TiresCatalog::Braking, 50))
                    .col(string_len_null(TiresCatalog::LoadType, 50))
                    .col(integer_null(TiresCatalog::Load))
                    .col(string_len_null(TiresCatalog::RoadType, 50))
                    .col(string_len_null(TiresCatalog::TerrainType, 50))
                    .col(string_len_null(TiresCatalog::Position, 50))
                    .col(big_integer(TiresCatalog::CreatedAt))
                    .col(big_integer(TiresCatalog::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TiresCatalog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum TiresCatalog {
    Table,
    Id,
    Brand,
    Model,
    Size,
    LayerIndex,
    Layers,
    MaxPressure,
    MinPressure,
    MaxDepth,
    MinDepth,
    WearType,
    Profitability,
    Performance,
    Temperature,
    Speed,
    SpeedNumber,
    Braking,
    LoadType,
    #[sea_orm(iden = "_load")]
    Load,
    RoadType,
    TerrainType,
    Position,
    CreatedAt,
    UpdatedAt,
}
