//! Deployment pipelines
//!
//! Pipelines are not wrapped in an envelope: Get, Create and Update answer
//! with the bare pipeline object and List with a bare array.

use crate::service::{ResourceKind, Service};
use serde::{Deserialize, Serialize};

/// Marker for the pipeline endpoints
pub enum Pipelines {}

pub type PipelineService = Service<Pipelines>;

impl ResourceKind for Pipelines {
    const COLLECTION: &'static str = "/pipelines";
    const NAME: &'static str = "pipeline";

    type Summary = Pipeline;
    type ListResponse = Vec<Pipeline>;
    type Record = Pipeline;
    type GetResponse = Pipeline;
    type CreateRequest = CreatePipelineRequest;
    type Created = Pipeline;
    type CreateResponse = Pipeline;
    type UpdateRequest = UpdatePipelineRequest;
    type Updated = Pipeline;
    type UpdateResponse = Pipeline;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipeline {
    pub id: String,
    pub display_name: String,
    pub stages: Vec<PipelineStage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineStage {
    pub id: String,
    pub display_name: String,
    /// `preview` or `standard`
    #[serde(rename = "type")]
    pub stage_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePipelineRequest {
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePipelineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UpdatePipelineRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
