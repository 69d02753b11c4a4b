//! `sevalla_object_storage`

use crate::error::{ProviderError, Result};
use crate::framework::support::{changed, non_empty, required};
use crate::framework::{Resource, ResourceModel};
use crate::provider::ProviderData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sevalla_api::{
    CancelToken, CreateObjectStorageRequest, ObjectStorage, UpdateObjectStorageRequest,
};
use tracing::{debug, info};

const KIND: &str = "object storage";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStorageModel {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Chosen by the platform when omitted
    pub region: Option<String>,

    // computed
    pub size: Option<i64>,
    pub objects: Option<i64>,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ResourceModel for ObjectStorageModel {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl From<ObjectStorage> for ObjectStorageModel {
    fn from(bucket: ObjectStorage) -> Self {
        ObjectStorageModel {
            id: Some(bucket.id),
            name: Some(bucket.name),
            region: non_empty(&bucket.region),
            size: Some(bucket.size),
            objects: Some(bucket.objects),
            endpoint: non_empty(&bucket.endpoint),
            access_key: non_empty(&bucket.access_key),
            secret_key: non_empty(&bucket.secret_key),
            created_at: bucket.created_at,
            updated_at: bucket.updated_at,
        }
    }
}

/// Lifecycle for object storage buckets
#[derive(Debug, Clone)]
pub struct ObjectStorageResource {
    data: ProviderData,
}

impl ObjectStorageResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Resource for ObjectStorageResource {
    type Model = ObjectStorageModel;

    fn type_name(&self) -> &'static str {
        "sevalla_object_storage"
    }

    async fn create(
        &self,
        plan: ObjectStorageModel,
        cancel: &CancelToken,
    ) -> Result<ObjectStorageModel> {
        let request = CreateObjectStorageRequest {
            name: required(&plan.name, "name")?.to_string(),
            region: plan.region.clone(),
        };

        debug!(name = %request.name, region = ?request.region, "Creating object storage");
        let bucket = self
            .data
            .client
            .object_storage()
            .create(&request, cancel)
            .await
            .map_err(ProviderError::api("create", KIND))?;

        info!(resource = KIND, id = %bucket.id, "Created object storage");
        Ok(bucket.into())
    }

    async fn read(
        &self,
        state: ObjectStorageModel,
        cancel: &CancelToken,
    ) -> Result<Option<ObjectStorageModel>> {
        let id = state.require_id()?;
        let bucket = super::found(
            self.data.client.object_storage().get(id, cancel).await,
            KIND,
            id,
        )?;
        Ok(bucket.map(ObjectStorageModel::from))
    }

    async fn update(
        &self,
        plan: ObjectStorageModel,
        prior: ObjectStorageModel,
        cancel: &CancelToken,
    ) -> Result<ObjectStorageModel> {
        let id = prior.require_id()?;
        super::unchanged(&plan.region, &prior.region, "region")?;

        let request = UpdateObjectStorageRequest {
            name: changed(&plan.name, &prior.name),
        };

        let service = self.data.client.object_storage();
        let bucket = if request.is_empty() {
            debug!(id, "No object storage changes to apply");
            service
                .get(id, cancel)
                .await
                .map_err(ProviderError::api("read", KIND))?
        } else {
            service
                .update(id, &request, cancel)
                .await
                .map_err(ProviderError::api("update", KIND))?
        };

        info!(resource = KIND, id, "Updated object storage");
        Ok(bucket.into())
    }

    async fn delete(&self, state: ObjectStorageModel, cancel: &CancelToken) -> Result<()> {
        let id = state.require_id()?;
        self.data
            .client
            .object_storage()
            .delete(id, cancel)
            .await
            .map_err(ProviderError::api("delete", KIND))?;
        info!(resource = KIND, id, "Deleted object storage");
        Ok(())
    }
}
