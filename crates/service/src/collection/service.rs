use std::sync::Arc;

use chrono::{Local, NaiveDate};
use common::pagination::{Page, Pagination};
use configs::ValidationConfig;
use models::collection::{CollectionPatch, CollectionRecord, NewCollection};
use tracing::{error, info, instrument, warn};

use crate::bulk_import::{self, BulkImportSummary, RowError};
use crate::collection::repository::CollectionRepository;
use crate::collection::CollectionFilter;
use crate::errors::ServiceError;

/// Application service for invoice collection records.
pub struct CollectionService<R: CollectionRepository> {
    repo: Arc<R>,
    rules: ValidationConfig,
}

impl<R: CollectionRepository> CollectionService<R> {
    pub fn new(repo: Arc<R>, rules: ValidationConfig) -> Self { Self { repo, rules } }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &CollectionFilter, pagination: Pagination) -> Result<Page<CollectionRecord>, ServiceError> {
        self.list_as_of(filter, pagination, Local::now().date_naive()).await
    }

    /// Same as [`list`](Self::list) with periods resolved against `today`.
    pub async fn list_as_of(
        &self,
        filter: &CollectionFilter,
        pagination: Pagination,
        today: NaiveDate,
    ) -> Result<Page<CollectionRecord>, ServiceError> {
        let filters = filter.to_filter_set(today);
        let page = self.repo.list(&filters, pagination).await.inspect_err(|e| {
            error!(error = %e, "list collections failed");
        })?;
        Ok(page.map(CollectionRecord::from))
    }

    pub async fn get(&self, id: i32) -> Result<CollectionRecord, ServiceError> {
        self.repo
            .get(id)
            .await?
            .map(CollectionRecord::from)
            .ok_or_else(|| ServiceError::not_found("Collection"))
    }

    #[instrument(skip(self, input), fields(invoice_number = %input.invoice_number))]
    pub async fn create(&self, input: &NewCollection) -> Result<i32, ServiceError> {
        input.validate(&self.rules)?;
        let id = self.repo.insert(input).await?;
        info!(id, "collection created");
        Ok(id)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: &CollectionPatch) -> Result<(), ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::invalid("No fields to update"));
        }
        patch.validate(&self.rules)?;
        match self.repo.update(id, patch).await? {
            0 => Err(ServiceError::not_found("Collection")),
            _ => {
                info!(id, "collection updated");
                Ok(())
            }
        }
    }

    /// Marks the record deleted; the row is kept.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        match self.repo.soft_delete(id).await? {
            0 => Err(ServiceError::not_found("Collection")),
            _ => {
                info!(id, "collection soft-deleted");
                Ok(())
            }
        }
    }

    /// Insert every row of an uploaded CSV/spreadsheet independently.
    ///
    /// Format and header problems fail the whole upload before any insert.
    /// After that a bad row only lands in `errors`; earlier inserts stay
    /// committed.
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn bulk_import(&self, filename: &str, content: &[u8]) -> Result<BulkImportSummary, ServiceError> {
        let rows = bulk_import::parse_upload(filename, content)?;
        let total_rows = rows.len();
        let mut inserted = 0usize;
        let mut errors = Vec::new();

        for row in rows {
            let outcome = match row.record {
                Ok(input) => self.create(&input).await.map_err(|e| e.detail().to_string()),
                Err(msg) => Err(msg),
            };
            match outcome {
                Ok(_) => inserted += 1,
                Err(error) => {
                    warn!(row = row.number, %error, "bulk import row rejected");
                    errors.push(RowError { row: row.number, error });
                }
            }
        }

        info!(total_rows, inserted, failed = errors.len(), "bulk import finished");
        Ok(BulkImportSummary::new(total_rows, inserted, errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{CollectionListQuery, SeaOrmCollectionRepository};
    use crate::test_support::{new_collection, seeded_db};
    use chrono::NaiveDate;
    use models::collection::Status;
    use rust_decimal::Decimal;

    async fn service() -> anyhow::Result<(CollectionService<SeaOrmCollectionRepository>, crate::test_support::Seed)> {
        let (db, seed) = seeded_db().await?;
        let repo = Arc::new(SeaOrmCollectionRepository::new(db));
        Ok((CollectionService::new(repo, ValidationConfig::default()), seed))
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trip() -> anyhow::Result<()> {
        let (svc, seed) = service().await?;
        let input = new_collection(&seed, "INV-100", ymd(2024, 3, 1));
        let id = svc.create(&input).await?;
        let got = svc.get(id).await?;
        assert_eq!(got.record.invoice_number, "INV-100");
        assert_eq!(got.record.status, Status::Pending);
        assert_eq!(got.record.amount, input.amount);
        assert_eq!(got.outstanding_balance, input.amount);
        assert!(!got.record.is_deleted);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_invoice_is_conflict() -> anyhow::Result<()> {
        let (svc, seed) = service().await?;
        svc.create(&new_collection(&seed, "INV-1", ymd(2024, 3, 1))).await?;
        let err = svc.create(&new_collection(&seed, "INV-1", ymd(2024, 3, 2))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "Invoice number already exists"));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_company_is_invalid_argument() -> anyhow::Result<()> {
        let (svc, seed) = service().await?;
        let mut input = new_collection(&seed, "INV-FK", ymd(2024, 3, 1));
        input.company_id = 9999;
        let err = svc.create(&input).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(ref m) if m == "Invalid company_id or user_id"));
        Ok(())
    }

    #[tokio::test]
    async fn soft_deleted_rows_disappear() -> anyhow::Result<()> {
        let (svc, seed) = service().await?;
        let keep = svc.create(&new_collection(&seed, "INV-KEEP", ymd(2024, 3, 1))).await?;
        let gone = svc.create(&new_collection(&seed, "INV-GONE", ymd(2024, 3, 2))).await?;

        svc.delete(gone).await?;
        assert!(matches!(svc.get(gone).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(gone).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.update(gone, &CollectionPatch { status: Some(Status::Paid), ..Default::default() }).await,
            Err(ServiceError::NotFound(_))
        ));

        let page = svc.list(&CollectionFilter::default(), Pagination::default()).await?;
        assert_eq!(page.info.total, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].record.id, keep);
        Ok(())
    }

    #[tokio::test]
    async fn partial_update_touches_only_given_fields() -> anyhow::Result<()> {
        let (svc, seed) = service().await?;
        let id = svc.create(&new_collection(&seed, "INV-P", ymd(2024, 3, 1))).await?;
        let before = svc.get(id).await?;

        let err = svc.update(id, &CollectionPatch::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(ref m) if m == "No fields to update"));

        let patch = CollectionPatch { amount_paid: Some(Decimal::new(2550, 2)), ..Default::default() };
        svc.update(id, &patch).await?;
        let after = svc.get(id).await?;
        assert_eq!(after.record.amount_paid, Decimal::new(2550, 2));
        assert_eq!(after.outstanding_balance, before.record.amount - Decimal::new(2550, 2));
        assert_eq!(after.record.invoice_number, before.record.invoice_number);
        assert_eq!(after.record.status, before.record.status);
        assert_eq!(after.record.customer_name, before.record.customer_name);
        assert!(after.record.last_update >= before.record.last_update);

        assert!(matches!(svc.update(4242, &patch).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_and_paginates() -> anyhow::Result<()> {
        let (svc, seed) = service().await?;
        for day in 1..=25 {
            let mut input = new_collection(&seed, &format!("INV-{day:03}"), ymd(2024, 2, day));
            if day % 5 == 0 {
                input.company_id = seed.other_company_id;
            }
            svc.create(&input).await?;
        }

        let page = svc.list(&CollectionFilter::default(), Pagination::default()).await?;
        assert_eq!(page.info.total, 25);
        assert_eq!(page.info.total_pages, 2);
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.items[0].record.invoice_date, ymd(2024, 2, 25));

        let second = svc.list(&CollectionFilter::default(), Pagination::from_query(Some(2), None)?).await?;
        assert_eq!(second.items.len(), 5);
        assert_eq!(second.items[4].record.invoice_date, ymd(2024, 2, 1));

        let by_company = CollectionFilter { company_id: Some(seed.other_company_id), ..Default::default() };
        let page = svc.list(&by_company, Pagination::default()).await?;
        assert_eq!(page.info.total, 5);

        let (window, p) = CollectionListQuery {
            from_date: Some(ymd(2024, 2, 10)),
            to_date: Some(ymd(2024, 2, 12)),
            ..Default::default()
        }
        .into_parts()?;
        assert_eq!(svc.list(&window, p).await?.info.total, 3);

        let last_month = CollectionFilter { period: Some(crate::period::Period::LastMonth), ..Default::default() };
        let page = svc.list_as_of(&last_month, Pagination::default(), ymd(2024, 3, 15)).await?;
        assert_eq!(page.info.total, 25);
        let page = svc.list_as_of(&last_month, Pagination::default(), ymd(2024, 5, 15)).await?;
        assert_eq!(page.info.total, 0);
        assert_eq!(page.info.total_pages, 0);
        Ok(())
    }

    #[tokio::test]
    async fn overpayment_rule_is_configurable() -> anyhow::Result<()> {
        let (db, seed) = seeded_db().await?;
        let strict = CollectionService::new(
            Arc::new(SeaOrmCollectionRepository::new(db)),
            ValidationConfig { allow_overpayment: false },
        );
        let mut input = new_collection(&seed, "INV-OVER", ymd(2024, 3, 1));
        input.amount_paid = input.amount + Decimal::ONE;
        assert!(matches!(strict.create(&input).await, Err(ServiceError::InvalidArgument(_))));
        Ok(())
    }

    #[tokio::test]
    async fn bulk_import_isolates_bad_rows() -> anyhow::Result<()> {
        let (svc, seed) = service().await?;
        let mut csv = String::from("invoice_number,company_id,customer_name,user_id,service,invoice_date,due_date,amount,branch\n");
        for i in 1..=3 {
            csv.push_str(&format!("B-{i},{},Cust {i},{},app,2024-01-0{i},2024-02-01,100.50,Q1\n", seed.company_id, seed.user_id));
        }
        csv.push_str(&format!("B-4,{},Cust 4,{},app,not-a-date,2024-02-01,10,Q1\n", seed.company_id, seed.user_id));
        for i in 5..=6 {
            csv.push_str(&format!("B-{i},{},Cust {i},{},tires,2024/01/0{i},01/31/2024,7,QT\n", seed.company_id, seed.user_id));
        }

        let summary = svc.bulk_import("upload.csv", csv.as_bytes()).await?;
        assert!(summary.success);
        assert_eq!(summary.total_rows, 6);
        assert_eq!(summary.inserted, 5);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors[0].row, 5);
        assert!(summary.errors[0].error.contains("invoice_date"), "{}", summary.errors[0].error);

        let page = svc.list(&CollectionFilter::default(), Pagination::default()).await?;
        assert_eq!(page.info.total, 5);
        Ok(())
    }

    #[tokio::test]
    async fn bulk_import_reports_duplicates_per_row() -> anyhow::Result<()> {
        let (svc, seed) = service().await?;
        let csv = format!(
            "invoice_number,company_id,customer_name,user_id,service,invoice_date,due_date,amount,branch,status\n\
             D-1,{c},A,{u},app,2024-01-01,2024-01-31,5,Q1,paid\n\
             D-1,{c},B,{u},app,2024-01-02,2024-01-31,6,Q1,\n",
            c = seed.company_id,
            u = seed.user_id
        );
        let summary = svc.bulk_import("dups.CSV", csv.as_bytes()).await?;
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.errors, vec![RowError { row: 3, error: "Invoice number already exists".into() }]);
        Ok(())
    }

    #[tokio::test]
    async fn bulk_import_rejects_bad_uploads_up_front() -> anyhow::Result<()> {
        let (svc, _) = service().await?;
        let err = svc.bulk_import("data.json", b"{}").await.unwrap_err();
        assert_eq!(err.detail(), "Invalid file format. Use CSV or Excel (.xlsx, .xls)");

        let err = svc.bulk_import("data.csv", b"invoice_number,amount\nX,1\n").await.unwrap_err();
        assert_eq!(
            err.detail(),
            "Missing required columns: company_id, customer_name, user_id, service, invoice_date, due_date, branch"
        );

        let page = svc.list(&CollectionFilter::default(), Pagination::default()).await?;
        assert_eq!(page.info.total, 0);
        Ok(())
    }

    #[tokio::test]
    async fn bulk_import_without_inserts_is_unsuccessful() -> anyhow::Result<()> {
        let (svc, _) = service().await?;
        let csv = "invoice_number,company_id,customer_name,user_id,service,invoice_date,due_date,amount,branch\n\
                   X-1,abc,A,1,app,2024-01-01,2024-01-31,5,Q1\n";
        let summary = svc.bulk_import("x.csv", csv.as_bytes()).await?;
        assert!(!summary.success);
        assert_eq!(summary.total_rows, 1);
        assert_eq!(summary.failed, 1);
        Ok(())
    }
}
