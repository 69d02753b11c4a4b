//! Static sites

use crate::service::{Items, ResourceKind, Service};
use serde::{Deserialize, Serialize};

/// Marker for the static site endpoints
pub enum StaticSites {}

pub type StaticSiteService = Service<StaticSites>;

impl ResourceKind for StaticSites {
    const COLLECTION: &'static str = "/static-sites";
    const NAME: &'static str = "static site";

    type Summary = StaticSiteSummary;
    type ListResponse = StaticSiteList;
    type Record = StaticSite;
    type GetResponse = StaticSiteEnvelope;
    type CreateRequest = CreateStaticSiteRequest;
    type Created = StaticSite;
    type CreateResponse = StaticSiteEnvelope;
    type UpdateRequest = UpdateStaticSiteRequest;
    type Updated = StaticSite;
    type UpdateResponse = StaticSiteEnvelope;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSite {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
    pub company_id: String,
    pub repo_url: String,
    pub default_branch: String,
    pub auto_deploy: bool,
    pub remote_repository_id: String,
    pub git_repository_id: String,
    pub git_type: String,
    pub hostname: String,
    pub build_command: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deployments: Vec<StaticSiteDeployment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSiteSummary {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSiteDeployment {
    pub id: String,
    pub status: String,
    pub repo_url: String,
    pub branch: String,
    pub commit_message: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaticSiteRequest {
    pub company_id: String,
    pub display_name: String,
    pub repo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateStaticSiteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    /// One of `16.20.0`, `18.16.0`, `20.2.0`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_directory: Option<String>,
}

impl UpdateStaticSiteRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticSiteEnvelope {
    pub static_site: StaticSite,
}

impl From<StaticSiteEnvelope> for StaticSite {
    fn from(envelope: StaticSiteEnvelope) -> Self {
        envelope.static_site
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticSiteList {
    #[serde(default)]
    company: StaticSiteListCompany,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StaticSiteListCompany {
    #[serde(default)]
    static_sites: Items<StaticSiteSummary>,
}

impl From<StaticSiteList> for Vec<StaticSiteSummary> {
    fn from(list: StaticSiteList) -> Self {
        list.company.static_sites.items
    }
}
