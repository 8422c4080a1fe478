use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Collection: default ordering and the most common filter
        manager
            .create_index(
                Index::create()
                    .name("idx_collection_invoice_date")
                    .table(Collection::Table)
                    .col(Collection::InvoiceDate)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_collection_company")
                    .table(Collection::Table)
                    .col(Collection::CompanyId)
                    .to_owned(),
            )
            .await?;

        // Tires: composite unique (brand, model, size, position)
        manager
            .create_index(
                Index::create()
                    .name("uniq_tire_brand_model_size_position")
                    .table(TiresCatalog::Table)
                    .col(TiresCatalog::Brand)
                    .col(TiresCatalog::Model)
                    .col(TiresCatalog::Size)
                    .col(TiresCatalog::Position)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_tire_brand_model_size_position").table(TiresCatalog::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_collection_company").table(Collection::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_collection_invoice_date").table(Collection::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Collection { Table, InvoiceDate, CompanyId }

#[derive(DeriveIden)]
enum TiresCatalog { Table, Brand, Model, Size, Position }
