//! `sevalla_database` lookup

use super::IdQuery;
use crate::error::{ProviderError, Result};
use crate::framework::DataSource;
use crate::provider::ProviderData;
use crate::resources::DatabaseModel;
use async_trait::async_trait;
use sevalla_api::CancelToken;

#[derive(Debug, Clone)]
pub struct DatabaseDataSource {
    data: ProviderData,
}

impl DatabaseDataSource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DataSource for DatabaseDataSource {
    type Query = IdQuery;
    type Model = DatabaseModel;

    fn type_name(&self) -> &'static str {
        "sevalla_database"
    }

    async fn read(&self, query: IdQuery, cancel: &CancelToken) -> Result<DatabaseModel> {
        let db = self
            .data
            .client
            .databases()
            .get(&query.id, cancel)
            .await
            .map_err(ProviderError::api("read", "database"))?;

        Ok(DatabaseModel::from_record(db, &DatabaseModel::default()))
    }
}
