use async_trait::async_trait;
use chrono::Utc;
use common::pagination::{Page, PageInfo, Pagination};
use models::db::Db;
use models::tire::{self, TireInput};
use sea_orm::sea_query::{Asterisk, Expr, Query, SimpleExpr};

use crate::errors::ServiceError;
use crate::filter::{distinct_values, paged_select, CountRow, DistinctValue, FilterSet};
use crate::tire::{TireFilterOptions, LIST_ORDER};

pub const DUPLICATE_TIRE: &str = "A tire with this brand, model, size, and position already exists";

#[async_trait]
pub trait TireRepository: Send + Sync {
    async fn list(&self, filters: &FilterSet, pagination: Pagination) -> Result<Page<tire::Model>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<tire::Model>, ServiceError>;
    async fn insert(&self, input: &TireInput) -> Result<i32, ServiceError>;
    /// Full replace; returns the number of rows changed.
    async fn update(&self, id: i32, input: &TireInput) -> Result<u64, ServiceError>;
    async fn delete(&self, id: i32) -> Result<u64, ServiceError>;
    async fn filter_options(&self) -> Result<TireFilterOptions, ServiceError>;
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmTireRepository {
    pub db: Db,
}

impl SeaOrmTireRepository {
    pub fn new(db: Db) -> Self { Self { db } }

    async fn distinct(&self, col: tire::Column, skip_nulls: bool) -> Result<Vec<String>, ServiceError> {
        let rows: Vec<DistinctValue> = self.db.query(&distinct_values::<tire::Entity>(col, skip_nulls)).await?;
        Ok(rows.into_iter().map(|r| r.value).collect())
    }
}

/// Writable columns in insert order, paired with their values.
fn column_values(input: &TireInput) -> Vec<(tire::Column, SimpleExpr)> {
    use tire::Column as C;
    vec![
        (C::Brand, input.brand.clone().into()),
        (C::Model, input.model.clone().into()),
        (C::Size, input.size.clone().into()),
        (C::LayerIndex, input.layer_index.clone().into()),
        (C::Layers, input.layers.into()),
        (C::MaxPressure, input.max_pressure.into()),
        (C::MinPressure, input.min_pressure.into()),
        (C::MaxDepth, input.max_depth.into()),
        (C::MinDepth, input.min_depth.into()),
        (C::WearType, input.wear_type.clone().into()),
        (C::Profitability, input.profitability.into()),
        (C::Performance, input.performance.into()),
        (C::Temperature, input.temperature.clone().into()),
        (C::Speed, input.speed.clone().into()),
        (C::SpeedNumber, input.speed_number.into()),
        (C::Braking, input.braking.clone().into()),
        (C::LoadType, input.load_type.clone().into()),
        (C::LoadValue, input.load.into()),
        (C::RoadType, input.road_type.clone().into()),
        (C::TerrainType, input.terrain_type.clone().into()),
        (C::Position, input.position.clone().into()),
    ]
}

#[async_trait]
impl TireRepository for SeaOrmTireRepository {
    async fn list(&self, filters: &FilterSet, pagination: Pagination) -> Result<Page<tire::Model>, ServiceError> {
        let q = paged_select::<tire::Entity>(filters, &LIST_ORDER, pagination);
        let total = self.db.query_one::<CountRow, _>(&q.count).await?.map_or(0, |r| r.total);
        let items = self.db.query::<tire::Model, _>(&q.page).await?;
        let total = u64::try_from(total).map_err(ServiceError::internal)?;
        Ok(Page { items, info: PageInfo::for_request(pagination, total) })
    }

    async fn get(&self, id: i32) -> Result<Option<tire::Model>, ServiceError> {
        let stmt = Query::select()
            .column(Asterisk)
            .from(tire::Entity)
            .and_where(Expr::col(tire::Column::Id).eq(id))
            .to_owned();
        Ok(self.db.query_one(&stmt).await?)
    }

    async fn insert(&self, input: &TireInput) -> Result<i32, ServiceError> {
        let now = Utc::now().timestamp_millis();
        let mut pairs = column_values(input);
        pairs.push((tire::Column::CreatedAt, now.into()));
        pairs.push((tire::Column::UpdatedAt, now.into()));
        let (columns, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();

        let stmt = Query::insert()
            .into_table(tire::Entity)
            .columns(columns)
            .values(values)
            .map_err(ServiceError::internal)?
            .to_owned();
        let out = self
            .db
            .execute(&stmt)
            .await
            .map_err(|e| ServiceError::from_unique(e, DUPLICATE_TIRE))?;
        i32::try_from(out.last_insert_id).map_err(ServiceError::internal)
    }

    async fn update(&self, id: i32, input: &TireInput) -> Result<u64, ServiceError> {
        let mut pairs = column_values(input);
        pairs.push((tire::Column::UpdatedAt, Utc::now().timestamp_millis().into()));
        let stmt = Query::update()
            .table(tire::Entity)
            .values(pairs)
            .and_where(Expr::col(tire::Column::Id).eq(id))
            .to_owned();
        let out = self
            .db
            .execute(&stmt)
            .await
            .map_err(|e| ServiceError::from_unique(e, DUPLICATE_TIRE))?;
        Ok(out.rows_affected)
    }

    async fn delete(&self, id: i32) -> Result<u64, ServiceError> {
        let stmt = Query::delete()
            .from_table(tire::Entity)
            .and_where(Expr::col(tire::Column::Id).eq(id))
            .to_owned();
        Ok(self.db.execute(&stmt).await?.rows_affected)
    }

    async fn filter_options(&self) -> Result<TireFilterOptions, ServiceError> {
        Ok(TireFilterOptions {
            brands: self.distinct(tire::Column::Brand, false).await?,
            models: self.distinct(tire::Column::Model, false).await?,
            sizes: self.distinct(tire::Column::Size, false).await?,
            positions: self.distinct(tire::Column::Position, true).await?,
        })
    }
}
