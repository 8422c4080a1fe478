//! Invoice collection tracking: listing with period filters, partial
//! updates, soft delete and spreadsheet import.

pub mod repository;
pub mod service;

use std::str::FromStr;

use chrono::NaiveDate;
use common::pagination::Pagination;
use models::collection::{self, Branch, Service, Status};
use sea_orm::sea_query::{Expr, Order};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::filter::FilterSet;
use crate::period::Period;

pub use repository::{CollectionRepository, SeaOrmCollectionRepository};
pub use service::CollectionService;

/// Newest invoices first; id breaks ties so paging is stable.
pub const LIST_ORDER: [(collection::Column, Order); 2] = [
    (collection::Column::InvoiceDate, Order::Desc),
    (collection::Column::Id, Order::Desc),
];

/// Raw query string of `GET /api/collection`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CollectionListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub company_id: Option<i32>,
    pub status: Option<String>,
    pub service: Option<String>,
    pub branch: Option<String>,
    pub period: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl CollectionListQuery {
    pub fn into_parts(self) -> Result<(CollectionFilter, Pagination), ServiceError> {
        let pagination = Pagination::from_query(self.page, self.limit)?;
        let filter = CollectionFilter {
            company_id: self.company_id,
            status: parse_present(&self.status)?,
            service: parse_present(&self.service)?,
            branch: parse_present(&self.branch)?,
            period: parse_present(&self.period)?,
            from_date: self.from_date,
            to_date: self.to_date,
        };
        Ok((filter, pagination))
    }
}

/// Empty query values (`?status=`) count as absent.
fn parse_present<T>(raw: &Option<String>) -> Result<Option<T>, ServiceError>
where
    T: FromStr,
    ServiceError: From<T::Err>,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => Ok(Some(v.parse::<T>()?)),
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollectionFilter {
    pub company_id: Option<i32>,
    pub status: Option<Status>,
    pub service: Option<Service>,
    pub branch: Option<Branch>,
    /// Takes precedence over `from_date`/`to_date`.
    pub period: Option<Period>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl CollectionFilter {
    pub fn date_range(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self.period {
            Some(p) => {
                let (start, end) = p.resolve(today);
                (Some(start), Some(end))
            }
            None => (self.from_date, self.to_date),
        }
    }

    /// Soft-deleted rows are always excluded.
    pub fn to_filter_set(&self, today: NaiveDate) -> FilterSet {
        let (from, to) = self.date_range(today);
        let mut f = FilterSet::new();
        f.always(Expr::col(collection::Column::IsDeleted).eq(false))
            .eq(collection::Column::CompanyId, self.company_id)
            .eq(collection::Column::Status, self.status.map(|s| s.as_str()))
            .eq(collection::Column::Service, self.service.map(|s| s.as_str()))
            .eq(collection::Column::Branch, self.branch.map(|b| b.as_str()))
            .gte(collection::Column::InvoiceDate, from)
            .lte(collection::Column::InvoiceDate, to);
        f
    }
}

/// Allowed values for every enumerated field, for building UI selectors.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnumCatalog {
    pub services: Vec<&'static str>,
    pub statuses: Vec<&'static str>,
    pub branches: Vec<&'static str>,
    pub periods: Vec<&'static str>,
}

pub fn enum_catalog() -> EnumCatalog {
    EnumCatalog {
        services: Service::ALL.iter().map(Service::as_str).collect(),
        statuses: Status::ALL.iter().map(Status::as_str).collect(),
        branches: Branch::ALL.iter().map(Branch::as_str).collect(),
        periods: Period::ALL.iter().map(Period::as_str).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::MysqlQueryBuilder;
    use crate::filter::paged_select;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn soft_delete_predicate_is_always_present() {
        let f = CollectionFilter::default().to_filter_set(ymd(2024, 3, 15));
        assert_eq!(f.len(), 1);
        let q = paged_select::<collection::Entity>(&f, &LIST_ORDER, Pagination::default());
        let (sql, _) = q.page.build(MysqlQueryBuilder);
        assert!(sql.contains("WHERE `is_deleted` = ?"), "{sql}");
        assert!(sql.contains("ORDER BY `invoice_date` DESC, `id` DESC"), "{sql}");
    }

    #[test]
    fn period_overrides_explicit_dates() {
        let filter = CollectionFilter {
            period: Some(Period::LastMonth),
            from_date: Some(ymd(2020, 1, 1)),
            to_date: Some(ymd(2020, 12, 31)),
            ..Default::default()
        };
        assert_eq!(
            filter.date_range(ymd(2024, 3, 15)),
            (Some(ymd(2024, 2, 1)), Some(ymd(2024, 2, 29)))
        );
    }

    #[test]
    fn every_supplied_filter_adds_one_predicate() {
        let filter = CollectionFilter {
            company_id: Some(3),
            status: Some(Status::Overdue),
            service: Some(Service::Hardware),
            branch: Some(Branch::Q2),
            from_date: Some(ymd(2024, 1, 1)),
            ..Default::default()
        };
        assert_eq!(filter.to_filter_set(ymd(2024, 3, 15)).len(), 6);
    }

    #[test]
    fn query_string_parts_are_validated() {
        let q = CollectionListQuery { period: Some("someday".into()), ..Default::default() };
        assert!(matches!(q.into_parts(), Err(ServiceError::InvalidArgument(m)) if m == "Invalid period: someday"));

        let q = CollectionListQuery { limit: Some(500), ..Default::default() };
        assert!(q.into_parts().is_err());

        let q = CollectionListQuery { period: Some("current_year".into()), page: Some(2), ..Default::default() };
        let (filter, p) = q.into_parts().unwrap();
        assert_eq!(filter.period, Some(Period::CurrentYear));
        assert_eq!(p.offset(), 20);

        let q = CollectionListQuery { status: Some("lost".into()), ..Default::default() };
        assert!(matches!(q.into_parts(), Err(ServiceError::InvalidArgument(_))));
    }

    #[test]
    fn blank_query_values_are_ignored() {
        let q = CollectionListQuery {
            status: Some(String::new()),
            service: Some(String::new()),
            branch: Some(" ".into()),
            period: Some(String::new()),
            ..Default::default()
        };
        let (filter, _) = q.into_parts().unwrap();
        assert_eq!(filter, CollectionFilter::default());

        let q = CollectionListQuery {
            status: Some("partially_paid".into()),
            service: Some("field_service".into()),
            branch: Some("QT".into()),
            ..Default::default()
        };
        let (filter, _) = q.into_parts().unwrap();
        assert_eq!(filter.status, Some(Status::PartiallyPaid));
        assert_eq!(filter.service, Some(Service::FieldService));
        assert_eq!(filter.branch, Some(Branch::QT));
    }

    #[test]
    fn catalog_lists_every_variant() {
        let c = enum_catalog();
        assert_eq!(c.services.len(), 9);
        assert_eq!(c.statuses, vec!["pending", "partially_paid", "paid", "overdue", "cancelled"]);
        assert_eq!(c.branches, vec!["Q1", "Q2", "QT"]);
        assert_eq!(c.periods.len(), 10);
    }
}
