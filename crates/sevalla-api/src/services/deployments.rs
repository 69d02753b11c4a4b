//! Application deployments

use crate::cancel::CancelToken;
use crate::client::SevallaClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deployment {
    pub id: String,
    pub status: String,
    pub branch: String,
    pub commit_hash: Option<String>,
    pub commit_message: Option<String>,
    pub created_at: i64,
}

/// Read access to an application's deployments
#[derive(Debug, Clone)]
pub struct DeploymentService {
    client: SevallaClient,
}

impl DeploymentService {
    pub fn new(client: SevallaClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, app_id: &str, cancel: &CancelToken) -> Result<Vec<Deployment>> {
        let path = format!("/applications/{}/deployments", urlencoding::encode(app_id));
        self.client.get(&path, &[], cancel).await
    }

    pub async fn get(
        &self,
        app_id: &str,
        deployment_id: &str,
        cancel: &CancelToken,
    ) -> Result<Deployment> {
        let path = format!(
            "/applications/{}/deployments/{}",
            urlencoding::encode(app_id),
            urlencoding::encode(deployment_id)
        );
        self.client.get(&path, &[], cancel).await
    }
}
