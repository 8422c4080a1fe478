use models::company;
use models::db::Db;
use sea_orm::sea_query::{Order, Query};

use crate::errors::ServiceError;

/// All companies, alphabetically.
pub async fn list_companies(db: &Db) -> Result<Vec<company::Model>, ServiceError> {
    let stmt = Query::select()
        .columns([company::Column::Id, company::Column::Name])
        .from(company::Entity)
        .order_by(company::Column::Name, Order::Asc)
        .to_owned();
    Ok(db.query(&stmt).await?)
}
