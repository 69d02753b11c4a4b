//! WordPress sites
//!
//! Site creation is asynchronous: the create call answers with an
//! [`OperationAccepted`] whose id must be polled (see
//! [`wait_for_operation`](crate::poller::wait_for_operation)) before the new
//! site's id is known.

use crate::service::{ResourceKind, Service};
use crate::services::operations::OperationAccepted;
use serde::{Deserialize, Serialize};

/// Marker for the site endpoints
pub enum Sites {}

pub type SiteService = Service<Sites>;

impl ResourceKind for Sites {
    const COLLECTION: &'static str = "/sites";
    const NAME: &'static str = "site";

    type Summary = SiteSummary;
    type ListResponse = SiteList;
    type Record = Site;
    type GetResponse = SiteEnvelope;
    type CreateRequest = CreateSiteRequest;
    type Created = OperationAccepted;
    type CreateResponse = OperationAccepted;
    type UpdateRequest = UpdateSiteRequest;
    type Updated = Site;
    type UpdateResponse = SiteEnvelope;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub company_id: String,
    pub status: String,
    pub environments: Vec<Environment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSummary {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
    #[serde(rename = "siteLabels")]
    pub site_labels: Vec<SiteLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteLabel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub is_premium: bool,
    pub is_blocked: bool,
    pub domains: Vec<Domain>,
    #[serde(rename = "primaryDomain")]
    pub primary_domain: Option<Domain>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub domain_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSiteRequest {
    pub company_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSiteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UpdateSiteRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteEnvelope {
    pub site: Site,
}

impl From<SiteEnvelope> for Site {
    fn from(envelope: SiteEnvelope) -> Self {
        envelope.site
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteList {
    #[serde(default)]
    company: SiteListCompany,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SiteListCompany {
    #[serde(default)]
    sites: Vec<SiteSummary>,
}

impl From<SiteList> for Vec<SiteSummary> {
    fn from(list: SiteList) -> Self {
        list.company.sites
    }
}
