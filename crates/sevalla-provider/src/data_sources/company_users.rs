//! `sevalla_company_users` lookup

use crate::error::{ProviderError, Result};
use crate::framework::DataSource;
use crate::provider::ProviderData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sevalla_api::{CancelToken, CompanyUser};

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyUsersQuery {
    pub company_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyUsersModel {
    pub company_id: String,
    pub users: Vec<CompanyUserModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyUserModel {
    pub id: String,
    pub email: String,
    pub image: String,
    pub full_name: String,
}

impl From<CompanyUser> for CompanyUserModel {
    fn from(user: CompanyUser) -> Self {
        CompanyUserModel {
            id: user.id,
            email: user.email,
            image: user.image,
            full_name: user.full_name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompanyUsersDataSource {
    data: ProviderData,
}

impl CompanyUsersDataSource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DataSource for CompanyUsersDataSource {
    type Query = CompanyUsersQuery;
    type Model = CompanyUsersModel;

    fn type_name(&self) -> &'static str {
        "sevalla_company_users"
    }

    async fn read(
        &self,
        query: CompanyUsersQuery,
        cancel: &CancelToken,
    ) -> Result<CompanyUsersModel> {
        let users = self
            .data
            .client
            .company()
            .users(&query.company_id, cancel)
            .await
            .map_err(ProviderError::api("read", "company users"))?;

        Ok(CompanyUsersModel {
            company_id: query.company_id,
            users: users.into_iter().map(CompanyUserModel::from).collect(),
        })
    }
}
