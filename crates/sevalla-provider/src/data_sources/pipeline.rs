//! `sevalla_pipeline` lookup

use super::IdQuery;
use crate::error::{ProviderError, Result};
use crate::framework::DataSource;
use crate::provider::ProviderData;
use crate::resources::PipelineModel;
use async_trait::async_trait;
use sevalla_api::CancelToken;

#[derive(Debug, Clone)]
pub struct PipelineDataSource {
    data: ProviderData,
}

impl PipelineDataSource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DataSource for PipelineDataSource {
    type Query = IdQuery;
    type Model = PipelineModel;

    fn type_name(&self) -> &'static str {
        "sevalla_pipeline"
    }

    async fn read(&self, query: IdQuery, cancel: &CancelToken) -> Result<PipelineModel> {
        let pipeline = self
            .data
            .client
            .pipelines()
            .get(&query.id, cancel)
            .await
            .map_err(ProviderError::api("read", "pipeline"))?;
        Ok(pipeline.into())
    }
}
