//! SeaORM-backed storage adapters that satisfy the domain storage traits while
//! keeping the database backend swappable (SQLite by default, PostgreSQL via
//! feature flag).

mod builder;
mod contest_store;
mod entity;
mod errors;
mod migration;
mod payment_store;
mod task_store;
mod user_store;

use std::sync::Arc;

use contest_hub_domain::storage::StorageResult;
use migration::run_migrations;
use sea_orm::{Database, DatabaseConnection};

pub use builder::StorageBuilder;

use errors::map_db_err;

/// Shared storage handle behind every store trait the API depends on.
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmStorage {
    /// Connects to the provided database URL and ensures the schema is present.
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        let db = Database::connect(database_url).await.map_err(map_db_err)?;
        run_migrations(&db).await?;
        Ok(Self { db: Arc::new(db) })
    }

    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    pub fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }
}
