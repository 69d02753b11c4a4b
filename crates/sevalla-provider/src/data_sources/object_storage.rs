//! `sevalla_object_storage` lookup

use super::IdQuery;
use crate::error::{ProviderError, Result};
use crate::framework::DataSource;
use crate::provider::ProviderData;
use crate::resources::ObjectStorageModel;
use async_trait::async_trait;
use sevalla_api::CancelToken;

#[derive(Debug, Clone)]
pub struct ObjectStorageDataSource {
    data: ProviderData,
}

impl ObjectStorageDataSource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DataSource for ObjectStorageDataSource {
    type Query = IdQuery;
    type Model = ObjectStorageModel;

    fn type_name(&self) -> &'static str {
        "sevalla_object_storage"
    }

    async fn read(&self, query: IdQuery, cancel: &CancelToken) -> Result<ObjectStorageModel> {
        let bucket = self
            .data
            .client
            .object_storage()
            .get(&query.id, cancel)
            .await
            .map_err(ProviderError::api("read", "object storage"))?;
        Ok(bucket.into())
    }
}
