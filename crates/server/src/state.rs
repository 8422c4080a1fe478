use std::sync::Arc;

use configs::ValidationConfig;
use models::db::Db;
use service::collection::{CollectionService, SeaOrmCollectionRepository};
use service::tire::{SeaOrmTireRepository, TireService};

/// Shared state of the collection service: the pool handle and services
/// built on it. Nothing mutable lives here.
#[derive(Clone)]
pub struct CollectionState {
    pub db: Db,
    pub collections: Arc<CollectionService<SeaOrmCollectionRepository>>,
}

impl CollectionState {
    pub fn new(db: Db, rules: ValidationConfig) -> Self {
        let repo = Arc::new(SeaOrmCollectionRepository::new(db.clone()));
        Self { db, collections: Arc::new(CollectionService::new(repo, rules)) }
    }
}

#[derive(Clone)]
pub struct TiresState {
    pub tires: Arc<TireService<SeaOrmTireRepository>>,
}

impl TiresState {
    pub fn new(db: Db) -> Self {
        Self { tires: Arc::new(TireService::new(Arc::new(SeaOrmTireRepository::new(db)))) }
    }
}
