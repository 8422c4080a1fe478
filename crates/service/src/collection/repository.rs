use async_trait::async_trait;
use chrono::Utc;
use common::pagination::{Page, PageInfo, Pagination};
use models::collection::{self, CollectionPatch, NewCollection};
use models::db::Db;
use sea_orm::sea_query::{Expr, Query, SimpleExpr};

use crate::collection::LIST_ORDER;
use crate::errors::ServiceError;
use crate::filter::{paged_select, CountRow, FilterSet};

pub const DUPLICATE_INVOICE: &str = "Invoice number already exists";
pub const INVALID_REFERENCE: &str = "Invalid company_id or user_id";

#[async_trait]
pub trait CollectionRepository: Send + Sync {
    async fn list(&self, filters: &FilterSet, pagination: Pagination) -> Result<Page<collection::Model>, ServiceError>;
    /// Non-deleted row by id.
    async fn get(&self, id: i32) -> Result<Option<collection::Model>, ServiceError>;
    async fn insert(&self, row: &NewCollection) -> Result<i32, ServiceError>;
    /// Returns the number of rows changed; soft-deleted rows are never touched.
    async fn update(&self, id: i32, patch: &CollectionPatch) -> Result<u64, ServiceError>;
    async fn soft_delete(&self, id: i32) -> Result<u64, ServiceError>;
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmCollectionRepository {
    pub db: Db,
}

impl SeaOrmCollectionRepository {
    pub fn new(db: Db) -> Self { Self { db } }
}

#[async_trait]
impl CollectionRepository for SeaOrmCollectionRepository {
    async fn list(&self, filters: &FilterSet, pagination: Pagination) -> Result<Page<collection::Model>, ServiceError> {
        let q = paged_select::<collection::Entity>(filters, &LIST_ORDER, pagination);
        let total = self.db.query_one::<CountRow, _>(&q.count).await?.map_or(0, |r| r.total);
        let items = self.db.query::<collection::Model, _>(&q.page).await?;
        let total = u64::try_from(total).map_err(ServiceError::internal)?;
        Ok(Page { items, info: PageInfo::for_request(pagination, total) })
    }

    async fn get(&self, id: i32) -> Result<Option<collection::Model>, ServiceError> {
        let stmt = Query::select()
            .column(sea_orm::sea_query::Asterisk)
            .from(collection::Entity)
            .and_where(Expr::col(collection::Column::Id).eq(id))
            .and_where(Expr::col(collection::Column::IsDeleted).eq(false))
            .to_owned();
        Ok(self.db.query_one(&stmt).await?)
    }

    async fn insert(&self, row: &NewCollection) -> Result<i32, ServiceError> {
        use collection::Column as C;
        let now = Utc::now();
        let stmt = Query::insert()
            .into_table(collection::Entity)
            .columns([
                C::InvoiceNumber,
                C::CompanyId,
                C::CustomerName,
                C::UserId,
                C::Service,
                C::InvoiceDate,
                C::DueDate,
                C::Amount,
                C::AmountPaid,
                C::Status,
                C::LastPartialPaymentDate,
                C::Branch,
                C::IsDeleted,
                C::CreatedAt,
                C::LastUpdate,
            ])
            .values([
                row.invoice_number.clone().into(),
                row.company_id.into(),
                row.customer_name.clone().into(),
                row.user_id.into(),
                row.service.as_str().into(),
                row.invoice_date.into(),
                row.due_date.into(),
                row.amount.into(),
                row.amount_paid.into(),
                row.status.as_str().into(),
                row.last_partial_payment_date.into(),
                row.branch.as_str().into(),
                false.into(),
                now.into(),
                now.into(),
            ])
            .map_err(ServiceError::internal)?
            .to_owned();
        let out = self
            .db
            .execute(&stmt)
            .await
            .map_err(|e| ServiceError::from_write(e, DUPLICATE_INVOICE, INVALID_REFERENCE))?;
        i32::try_from(out.last_insert_id).map_err(ServiceError::internal)
    }

    async fn update(&self, id: i32, patch: &CollectionPatch) -> Result<u64, ServiceError> {
        use collection::Column as C;
        let mut values: Vec<(C, SimpleExpr)> = Vec::new();
        if let Some(v) = &patch.invoice_number { values.push((C::InvoiceNumber, v.clone().into())); }
        if let Some(v) = patch.company_id { values.push((C::CompanyId, v.into())); }
        if let Some(v) = &patch.customer_name { values.push((C::CustomerName, v.clone().into())); }
        if let Some(v) = patch.user_id { values.push((C::UserId, v.into())); }
        if let Some(v) = patch.service { values.push((C::Service, v.as_str().into())); }
        if let Some(v) = patch.invoice_date { values.push((C::InvoiceDate, v.into())); }
        if let Some(v) = patch.due_date { values.push((C::DueDate, v.into())); }
        if let Some(v) = patch.amount { values.push((C::Amount, v.into())); }
        if let Some(v) = patch.amount_paid { values.push((C::AmountPaid, v.into())); }
        if let Some(v) = patch.status { values.push((C::Status, v.as_str().into())); }
        if let Some(v) = patch.last_partial_payment_date { values.push((C::LastPartialPaymentDate, v.into())); }
        if let Some(v) = patch.branch { values.push((C::Branch, v.as_str().into())); }
        if values.is_empty() {
            return Err(ServiceError::invalid("No fields to update"));
        }
        values.push((C::LastUpdate, Utc::now().into()));

        let stmt = Query::update()
            .table(collection::Entity)
            .values(values)
            .and_where(Expr::col(C::Id).eq(id))
            .and_where(Expr::col(C::IsDeleted).eq(false))
            .to_owned();
        let out = self
            .db
            .execute(&stmt)
            .await
            .map_err(|e| ServiceError::from_write(e, DUPLICATE_INVOICE, INVALID_REFERENCE))?;
        Ok(out.rows_affected)
    }

    async fn soft_delete(&self, id: i32) -> Result<u64, ServiceError> {
        let stmt = Query::update()
            .table(collection::Entity)
            .values([
                (collection::Column::IsDeleted, true.into()),
                (collection::Column::LastUpdate, Utc::now().into()),
            ])
            .and_where(Expr::col(collection::Column::Id).eq(id))
            .and_where(Expr::col(collection::Column::IsDeleted).eq(false))
            .to_owned();
        Ok(self.db.execute(&stmt).await?.rows_affected)
    }
}
