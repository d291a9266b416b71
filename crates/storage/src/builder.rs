use contest_hub_domain::storage::{StorageError, StorageResult};

use crate::SeaOrmStorage;

/// Builder-style construction for the storage handle, so bootstrap code can
/// grow options without changing call sites.
#[derive(Default)]
pub struct StorageBuilder {
    database_url: Option<String>,
}

impl StorageBuilder {
    pub fn new() -> Self {
        Self { database_url: None }
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub async fn build(self) -> StorageResult<SeaOrmStorage> {
        let url = self
            .database_url
            .ok_or_else(|| StorageError::Database("missing database url".into()))?;
        SeaOrmStorage::connect(&url).await
    }
}
