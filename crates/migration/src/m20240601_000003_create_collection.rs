//! Create `collection` table with FKs to `companies` and `users`.
//!
//! Invoices are soft-deleted through `is_deleted`; rows are never removed.
use sea_orm_migration::{prelude::*, schema::*, sea_orm::DbBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// SQLite has no fixed-point type; REAL affinity keeps whole amounts as floats.
fn money<T: IntoIden>(backend: DbBackend, col: T) -> ColumnDef {
    match backend {
        DbBackend::Sqlite => double(col),
        _ => decimal_len(col, 12, 2),
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        manager
            .create_table(
                Table::create()
                    .table(Collection::Table)
                    .if_not_exists()
                    .col(pk_auto(Collection::Id))
                    .col(string_len(Collection::InvoiceNumber, 100).unique_key())
                    .col(integer(Collection::CompanyId))
                    .col(string_len(Collection::CustomerName, 255))
                    .col(integer(Collection::UserId))
                    .col(string_len(Collection::Service, 32))
                    .col(date(Collection::InvoiceDate))
                    .col(date(Collection::DueDate))
                    .col(money(backend, Collection::Amount))
                    .col(money(backend, Collection::AmountPaid).default(0))
                    .col(string_len(Collection::Status, 32).default("pending"))
                    .col(date_null(Collection::LastPartialPaymentDate))
                    .col(string_len(Collection::Branch, 8))
                    .col(boolean(Collection::IsDeleted).default(false))
                    .col(timestamp_with_time_zone(Collection::CreatedAt))
                    .col(timestamp_with_time_zone(Collection::LastUpdate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collection_company")
                            .from(Collection::Table, Collection::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collection_user")
                            .from(Collection::Table, Collection::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Collection::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Collection {
    Table,
    Id,
    InvoiceNumber,
    CompanyId,
    CustomerName,
    UserId,
    Service,
    InvoiceDate,
    DueDate,
    Amount,
    AmountPaid,
    Status,
    LastPartialPaymentDate,
    Branch,
    IsDeleted,
    CreatedAt,
    LastUpdate,
}

#[derive(DeriveIden)]
enum Companies { Table, Id }

#[derive(DeriveIden)]
enum Users { Table, Id }
