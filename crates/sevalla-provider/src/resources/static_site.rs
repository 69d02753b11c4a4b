//! `sevalla_static_site`

use crate::error::{ProviderError, Result};
use crate::framework::support::{changed, non_empty, required, timestamp};
use crate::framework::{Resource, ResourceModel};
use crate::provider::ProviderData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sevalla_api::{CancelToken, CreateStaticSiteRequest, StaticSite, UpdateStaticSiteRequest};
use tracing::{debug, info};

const KIND: &str = "static site";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSiteModel {
    pub id: Option<String>,
    pub company_id: Option<String>,
    pub display_name: Option<String>,
    pub repo_url: Option<String>,
    pub default_branch: Option<String>,
    pub auto_deploy: Option<bool>,
    pub build_command: Option<String>,
    pub node_version: Option<String>,
    pub published_directory: Option<String>,

    // computed
    pub name: Option<String>,
    pub status: Option<String>,
    pub hostname: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ResourceModel for StaticSiteModel {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl StaticSiteModel {
    /// Rebuild from a record. Node version and publish directory are never
    /// returned, so the prior values stand.
    pub fn from_record(site: StaticSite, prior: &StaticSiteModel) -> Self {
        StaticSiteModel {
            id: Some(site.id),
            company_id: non_empty(&site.company_id).or_else(|| prior.company_id.clone()),
            display_name: Some(site.display_name),
            repo_url: non_empty(&site.repo_url).or_else(|| prior.repo_url.clone()),
            default_branch: non_empty(&site.default_branch),
            auto_deploy: Some(site.auto_deploy),
            build_command: site.build_command,
            node_version: prior.node_version.clone(),
            published_directory: prior.published_directory.clone(),
            name: non_empty(&site.name),
            status: non_empty(&site.status),
            hostname: non_empty(&site.hostname),
            created_at: timestamp(site.created_at),
            updated_at: timestamp(site.updated_at),
        }
    }

    fn settings(&self) -> UpdateStaticSiteRequest {
        UpdateStaticSiteRequest {
            auto_deploy: self.auto_deploy,
            build_command: self.build_command.clone(),
            node_version: self.node_version.clone(),
            published_directory: self.published_directory.clone(),
            ..Default::default()
        }
    }
}

/// Lifecycle for static sites
#[derive(Debug, Clone)]
pub struct StaticSiteResource {
    data: ProviderData,
}

impl StaticSiteResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Resource for StaticSiteResource {
    type Model = StaticSiteModel;

    fn type_name(&self) -> &'static str {
        "sevalla_static_site"
    }

    async fn create(&self, plan: StaticSiteModel, cancel: &CancelToken) -> Result<StaticSiteModel> {
        let request = CreateStaticSiteRequest {
            company_id: required(&plan.company_id, "company_id")?.to_string(),
            display_name: required(&plan.display_name, "display_name")?.to_string(),
            repo_url: required(&plan.repo_url, "repo_url")?.to_string(),
            branch: plan.default_branch.clone(),
        };

        debug!(
            company_id = %request.company_id,
            display_name = %request.display_name,
            "Creating static site"
        );
        let service = self.data.client.static_sites();
        let mut site = service
            .create(&request, cancel)
            .await
            .map_err(ProviderError::api("create", KIND))?;

        let settings = plan.settings();
        if !settings.is_empty() {
            debug!(id = %site.id, "Applying static site settings");
            site = super::apply_settings(&service, KIND, &site.id, &settings, cancel).await?;
        }

        info!(resource = KIND, id = %site.id, "Created static site");
        Ok(StaticSiteModel::from_record(site, &plan))
    }

    async fn read(
        &self,
        state: StaticSiteModel,
        cancel: &CancelToken,
    ) -> Result<Option<StaticSiteModel>> {
        let id = state.require_id()?;
        let site = super::found(self.data.client.static_sites().get(id, cancel).await, KIND, id)?;
        Ok(site.map(|site| StaticSiteModel::from_record(site, &state)))
    }

    async fn update(
        &self,
        plan: StaticSiteModel,
        prior: StaticSiteModel,
        cancel: &CancelToken,
    ) -> Result<StaticSiteModel> {
        let id = prior.require_id()?;
        super::unchanged(&plan.company_id, &prior.company_id, "company_id")?;
        super::unchanged(&plan.repo_url, &prior.repo_url, "repo_url")?;

        let request = UpdateStaticSiteRequest {
            display_name: changed(&plan.display_name, &prior.display_name),
            auto_deploy: changed(&plan.auto_deploy, &prior.auto_deploy),
            default_branch: changed(&plan.default_branch, &prior.default_branch),
            build_command: changed(&plan.build_command, &prior.build_command),
            node_version: changed(&plan.node_version, &prior.node_version),
            published_directory: changed(&plan.published_directory, &prior.published_directory),
        };

        let service = self.data.client.static_sites();
        let site = if request.is_empty() {
            debug!(id, "No static site changes to apply");
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

        info!(resource = KIND, id, "Updated static site");
        let mut carried = prior.clone();
        carried.node_version = plan.node_version.or(prior.node_version.clone());
        carried.published_directory = plan
            .published_directory
            .or(prior.published_directory.clone());
        Ok(StaticSiteModel::from_record(site, &carried))
    }

    async fn delete(&self, state: StaticSiteModel, cancel: &CancelToken) -> Result<()> {
        let id = state.require_id()?;
        self.data
            .client
            .static_sites()
            .delete(id, cancel)
            .await
            .map_err(ProviderError::api("delete", KIND))?;
        info!(resource = KIND, id, "Deleted static site");
        Ok(())
    }
}
