//! Company membership

use crate::cancel::CancelToken;
use crate::client::SevallaClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyUser {
    pub id: String,
    pub email: String,
    pub image: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
struct CompanyUsersResponse {
    #[serde(default)]
    company: CompanyUsersBody,
}

#[derive(Debug, Default, Deserialize)]
struct CompanyUsersBody {
    #[serde(default)]
    users: Vec<Membership>,
}

#[derive(Debug, Deserialize)]
struct Membership {
    user: CompanyUser,
}

#[derive(Debug, Clone)]
pub struct CompanyService {
    client: SevallaClient,
}

impl CompanyService {
    pub fn new(client: SevallaClient) -> Self {
        Self { client }
    }

    /// Users belonging to a company
    pub async fn users(&self, company_id: &str, cancel: &CancelToken) -> Result<Vec<CompanyUser>> {
        let path = format!("/company/{}/users", urlencoding::encode(company_id));
        let response: CompanyUsersResponse = self.client.get(&path, &[], cancel).await?;
        Ok(response
            .company
            .users
            .into_iter()
            .map(|membership| membership.user)
            .collect())
    }
}
