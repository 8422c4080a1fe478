use std::sync::Arc;

use common::pagination::{Page, Pagination};
use models::tire::{self, TireInput};
use tracing::{error, info, instrument};

use crate::errors::ServiceError;
use crate::tire::repository::TireRepository;
use crate::tire::{TireFilter, TireFilterOptions};

/// Application service for the tires catalog. Deletes are physical.
pub struct TireService<R: TireRepository> {
    repo: Arc<R>,
}

impl<R: TireRepository> TireService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &TireFilter, pagination: Pagination) -> Result<Page<tire::Model>, ServiceError> {
        self.repo
            .list(&filter.to_filter_set(), pagination)
            .await
            .inspect_err(|e| error!(error = %e, "list tires failed"))
    }

    pub async fn get(&self, id: i32) -> Result<tire::Model, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Tire"))
    }

    #[instrument(skip(self, input), fields(brand = %input.brand, model = %input.model, size = %input.size))]
    pub async fn create(&self, input: &TireInput) -> Result<i32, ServiceError> {
        input.validate()?;
        let id = self.repo.insert(input).await?;
        info!(id, "tire created");
        Ok(id)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: &TireInput) -> Result<(), ServiceError> {
        input.validate()?;
        match self.repo.update(id, input).await? {
            0 => Err(ServiceError::not_found("Tire")),
            _ => {
                info!(id, "tire updated");
                Ok(())
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        match self.repo.delete(id).await? {
            0 => Err(ServiceError::not_found("Tire")),
            _ => {
                info!(id, "tire deleted");
                Ok(())
            }
        }
    }

    pub async fn filter_options(&self) -> Result<TireFilterOptions, ServiceError> {
        self.repo.filter_options().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_db;
    use crate::tire::{SeaOrmTireRepository, TireListQuery};

    async fn service() -> anyhow::Result<TireService<SeaOrmTireRepository>> {
        let db = memory_db().await?;
        Ok(TireService::new(Arc::new(SeaOrmTireRepository::new(db))))
    }

    fn tire_at(brand: &str, model: &str, size: &str, position: Option<&str>) -> TireInput {
        let mut t = TireInput::new(brand, model, size);
        t.position = position.map(str::to_string);
        t
    }

    #[tokio::test]
    async fn create_get_update_delete() -> anyhow::Result<()> {
        let svc = service().await?;
        let mut input = tire_at("Michelin", "X Multi D", "295/80R22.5", Some("drive"));
        input.load = Some(152);
        let id = svc.create(&input).await?;

        let got = svc.get(id).await?;
        assert_eq!(got.brand, "Michelin");
        assert_eq!(got.load_value, Some(152));
        assert_eq!(got.layers, Some(0));
        assert!(got.created_at > 0);
        assert_eq!(got.created_at, got.updated_at);

        input.max_depth = Some(22);
        input.position = None;
        svc.update(id, &input).await?;
        let got = svc.get(id).await?;
        assert_eq!(got.max_depth, Some(22));
        assert_eq!(got.position, None);
        assert!(got.updated_at >= got.created_at);

        svc.delete(id).await?;
        assert!(matches!(svc.get(id).await, Err(ServiceError::NotFound(ref m)) if m == "Tire not found"));
        assert!(matches!(svc.delete(id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.update(id, &input).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_key_is_conflict() -> anyhow::Result<()> {
        let svc = service().await?;
        svc.create(&tire_at("Goodyear", "KMAX", "11R22.5", Some("steer"))).await?;
        svc.create(&tire_at("Goodyear", "KMAX", "11R22.5", Some("drive"))).await?;
        let err = svc.create(&tire_at("Goodyear", "KMAX", "11R22.5", Some("steer"))).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == DUPLICATE));
        Ok(())
    }

    const DUPLICATE: &str = crate::tire::repository::DUPLICATE_TIRE;

    #[tokio::test]
    async fn invalid_input_never_reaches_the_database() -> anyhow::Result<()> {
        let svc = service().await?;
        let mut bad = tire_at("", "M", "S", None);
        assert!(matches!(svc.create(&bad).await, Err(ServiceError::InvalidArgument(_))));
        bad.brand = "B".into();
        bad.min_pressure = Some(-5);
        assert!(matches!(svc.create(&bad).await, Err(ServiceError::InvalidArgument(_))));
        assert_eq!(svc.list(&TireFilter::default(), Pagination::default()).await?.info.total, 0);
        Ok(())
    }

    #[tokio::test]
    async fn search_filters_and_options() -> anyhow::Result<()> {
        let svc = service().await?;
        svc.create(&tire_at("Michelin", "X Line", "295/80R22.5", Some("steer"))).await?;
        svc.create(&tire_at("Michelin", "X Works", "315/80R22.5", Some("drive"))).await?;
        svc.create(&tire_at("Bridgestone", "R268", "11R22.5", None)).await?;
        svc.create(&tire_at("Bridgestone", "M729", "11R24.5", Some("drive"))).await?;

        let all = svc.list(&TireFilter::default(), Pagination::default()).await?;
        assert_eq!(all.info.total, 4);
        assert_eq!(all.items[0].model, "M729");

        let (filter, p) = TireListQuery { search: Some("22.5".into()), ..Default::default() }.into_parts()?;
        assert_eq!(svc.list(&filter, p).await?.info.total, 3);

        let (filter, p) = TireListQuery {
            brand: Some("Michelin".into()),
            position: Some("drive".into()),
            ..Default::default()
        }
        .into_parts()?;
        let page = svc.list(&filter, p).await?;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].model, "X Works");

        let (filter, p) = TireListQuery { limit: Some(3), page: Some(2), ..Default::default() }.into_parts()?;
        let page = svc.list(&filter, p).await?;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.info.total_pages, 2);

        let opts = svc.filter_options().await?;
        assert_eq!(opts.brands, vec!["Bridgestone", "Michelin"]);
        assert_eq!(opts.sizes, vec!["11R22.5", "11R24.5", "295/80R22.5", "315/80R22.5"]);
        assert_eq!(opts.positions, vec!["drive", "steer"]);
        assert_eq!(opts.models.len(), 4);
        Ok(())
    }
}
