//! `sevalla_pipeline`

use crate::error::{ProviderError, Result};
use crate::framework::support::{changed, required};
use crate::framework::{Resource, ResourceModel};
use crate::provider::ProviderData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sevalla_api::{CancelToken, CreatePipelineRequest, Pipeline, UpdatePipelineRequest};
use tracing::{debug, info};

const KIND: &str = "pipeline";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineModel {
    pub id: Option<String>,
    pub display_name: Option<String>,

    // computed
    pub stages: Vec<PipelineStageModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineStageModel {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub stage_type: String,
}

impl ResourceModel for PipelineModel {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl From<Pipeline> for PipelineModel {
    fn from(pipeline: Pipeline) -> Self {
        PipelineModel {
            id: Some(pipeline.id),
            display_name: Some(pipeline.display_name),
            stages: pipeline
                .stages
                .into_iter()
                .map(|stage| PipelineStageModel {
                    id: stage.id,
                    display_name: stage.display_name,
                    stage_type: stage.stage_type,
                })
                .collect(),
        }
    }
}

/// Lifecycle for deployment pipelines
#[derive(Debug, Clone)]
pub struct PipelineResource {
    data: ProviderData,
}

impl PipelineResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Resource for PipelineResource {
    type Model = PipelineModel;

    fn type_name(&self) -> &'static str {
        "sevalla_pipeline"
    }

    async fn create(&self, plan: PipelineModel, cancel: &CancelToken) -> Result<PipelineModel> {
        let request = CreatePipelineRequest {
            display_name: required(&plan.display_name, "display_name")?.to_string(),
        };

        debug!(display_name = %request.display_name, "Creating pipeline");
        let pipeline = self
            .data
            .client
            .pipelines()
            .create(&request, cancel)
            .await
            .map_err(ProviderError::api("create", KIND))?;

        info!(resource = KIND, id = %pipeline.id, "Created pipeline");
        Ok(pipeline.into())
    }

    async fn read(&self, state: PipelineModel, cancel: &CancelToken) -> Result<Option<PipelineModel>> {
        let id = state.require_id()?;
        let pipeline = super::found(self.data.client.pipelines().get(id, cancel).await, KIND, id)?;
        Ok(pipeline.map(PipelineModel::from))
    }

    async fn update(
        &self,
        plan: PipelineModel,
        prior: PipelineModel,
        cancel: &CancelToken,
    ) -> Result<PipelineModel> {
        let id = prior.require_id()?;
        let request = UpdatePipelineRequest {
            display_name: changed(&plan.display_name, &prior.display_name),
        };

        let service = self.data.client.pipelines();
        let pipeline = if request.is_empty() {
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

        info!(resource = KIND, id, "Updated pipeline");
        Ok(pipeline.into())
    }

    async fn delete(&self, state: PipelineModel, cancel: &CancelToken) -> Result<()> {
        let id = state.require_id()?;
        self.data
            .client
            .pipelines()
            .delete(id, cancel)
            .await
            .map_err(ProviderError::api("delete", KIND))?;
        info!(resource = KIND, id, "Deleted pipeline");
        Ok(())
    }
}
