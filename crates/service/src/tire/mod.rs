//! Tires catalog: search, equality filters and distinct filter values.

pub mod repository;
pub mod service;

use common::pagination::Pagination;
use models::tire;
use sea_orm::sea_query::Order;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::filter::FilterSet;

pub use repository::{SeaOrmTireRepository, TireRepository};
pub use service::TireService;

pub const LIST_ORDER: [(tire::Column, Order); 1] = [(tire::Column::Id, Order::Desc)];

/// Query string of `GET /api/tires`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TireListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub size: Option<String>,
    pub position: Option<String>,
}

impl TireListQuery {
    pub fn into_parts(self) -> Result<(TireFilter, Pagination), ServiceError> {
        let pagination = Pagination::from_query(self.page, self.limit)?;
        let filter = TireFilter {
            search: self.search,
            brand: self.brand,
            model: self.model,
            size: self.size,
            position: self.position,
        };
        Ok((filter, pagination))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TireFilter {
    /// Substring match over brand, model and size.
    pub search: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub size: Option<String>,
    pub position: Option<String>,
}

impl TireFilter {
    pub fn to_filter_set(&self) -> FilterSet {
        let mut f = FilterSet::new();
        f.contains_any(
            [tire::Column::Brand, tire::Column::Model, tire::Column::Size],
            self.search.as_deref(),
        )
        .eq(tire::Column::Brand, non_empty(&self.brand))
        .eq(tire::Column::Model, non_empty(&self.model))
        .eq(tire::Column::Size, non_empty(&self.size))
        .eq(tire::Column::Position, non_empty(&self.position));
        f
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

/// Distinct values for the catalog's filter dropdowns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TireFilterOptions {
    pub brands: Vec<String>,
    pub models: Vec<String>,
    pub sizes: Vec<String>,
    pub positions: Vec<String>,
}
