//! `sevalla_site`
//!
//! Sites are provisioned asynchronously: create answers with an operation id,
//! the operation is polled to completion, and the site it produced is read to
//! build the state.

use crate::error::{ProviderError, Result};
use crate::framework::support::{changed, non_empty, required};
use crate::framework::{Resource, ResourceModel};
use crate::provider::ProviderData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sevalla_api::services::sites::{Domain, Environment};
use sevalla_api::{CancelToken, CreateSiteRequest, Site, UpdateSiteRequest, wait_for_operation};
use tracing::{debug, info};

const KIND: &str = "site";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteModel {
    pub id: Option<String>,
    pub company_id: Option<String>,
    pub display_name: Option<String>,

    // computed
    pub name: Option<String>,
    pub status: Option<String>,
    pub environments: Vec<EnvironmentModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentModel {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub is_premium: bool,
    pub is_blocked: bool,
    pub domains: Vec<DomainModel>,
    pub primary_domain: Option<DomainModel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainModel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub domain_type: String,
}

impl From<Domain> for DomainModel {
    fn from(domain: Domain) -> Self {
        DomainModel {
            id: domain.id,
            name: domain.name,
            domain_type: domain.domain_type,
        }
    }
}

impl From<Environment> for EnvironmentModel {
    fn from(env: Environment) -> Self {
        EnvironmentModel {
            id: env.id,
            name: env.name,
            display_name: env.display_name,
            is_premium: env.is_premium,
            is_blocked: env.is_blocked,
            domains: env.domains.into_iter().map(DomainModel::from).collect(),
            primary_domain: env.primary_domain.map(DomainModel::from),
        }
    }
}

impl ResourceModel for SiteModel {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl SiteModel {
    pub fn from_record(site: Site, prior: &SiteModel) -> Self {
        SiteModel {
            id: Some(site.id),
            company_id: non_empty(&site.company_id).or_else(|| prior.company_id.clone()),
            display_name: Some(site.display_name),
            name: non_empty(&site.name),
            status: non_empty(&site.status),
            environments: site
                .environments
                .into_iter()
                .map(EnvironmentModel::from)
                .collect(),
        }
    }
}

/// Lifecycle for WordPress sites
#[derive(Debug, Clone)]
pub struct SiteResource {
    data: ProviderData,
}

impl SiteResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Resource for SiteResource {
    type Model = SiteModel;

    fn type_name(&self) -> &'static str {
        "sevalla_site"
    }

    async fn create(&self, plan: SiteModel, cancel: &CancelToken) -> Result<SiteModel> {
        let request = CreateSiteRequest {
            company_id: required(&plan.company_id, "company_id")?.to_string(),
            display_name: required(&plan.display_name, "display_name")?.to_string(),
        };

        debug!(
            company_id = %request.company_id,
            display_name = %request.display_name,
            "Creating site"
        );
        let client = &self.data.client;
        let accepted = client
            .sites()
            .create(&request, cancel)
            .await
            .map_err(ProviderError::api("create", KIND))?;

        debug!(operation_id = %accepted.operation_id, "Waiting for site creation");
        let site_id = wait_for_operation(
            client,
            &accepted.operation_id,
            &self.data.poll,
            cancel,
            None,
        )
        .await
        .map_err(ProviderError::Operation)?;

        let site = client
            .sites()
            .get(&site_id, cancel)
            .await
            .map_err(ProviderError::api("read created", KIND))?;

        info!(
            resource = KIND,
            id = %site.id,
            operation_id = %accepted.operation_id,
            "Created site"
        );
        Ok(SiteModel::from_record(site, &plan))
    }

    async fn read(&self, state: SiteModel, cancel: &CancelToken) -> Result<Option<SiteModel>> {
        let id = state.require_id()?;
        let site = super::found(self.data.client.sites().get(id, cancel).await, KIND, id)?;
        Ok(site.map(|site| SiteModel::from_record(site, &state)))
    }

    async fn update(
        &self,
        plan: SiteModel,
        prior: SiteModel,
        cancel: &CancelToken,
    ) -> Result<SiteModel> {
        let id = prior.require_id()?;
        super::unchanged(&plan.company_id, &prior.company_id, "company_id")?;

        let request = UpdateSiteRequest {
            display_name: changed(&plan.display_name, &prior.display_name),
        };

        let service = self.data.client.sites();
        let site = if request.is_empty() {
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

        info!(resource = KIND, id, "Updated site");
        Ok(SiteModel::from_record(site, &prior))
    }

    async fn delete(&self, state: SiteModel, cancel: &CancelToken) -> Result<()> {
        let id = state.require_id()?;
        self.data
            .client
            .sites()
            .delete(id, cancel)
            .await
            .map_err(ProviderError::api("delete", KIND))?;
        info!(resource = KIND, id, "Deleted site");
        Ok(())
    }
}
