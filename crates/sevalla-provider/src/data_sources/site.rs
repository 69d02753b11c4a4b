//! `sevalla_site` lookup

use super::IdQuery;
use crate::error::{ProviderError, Result};
use crate::framework::DataSource;
use crate::provider::ProviderData;
use crate::resources::SiteModel;
use async_trait::async_trait;
use sevalla_api::CancelToken;

#[derive(Debug, Clone)]
pub struct SiteDataSource {
    data: ProviderData,
}

impl SiteDataSource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DataSource for SiteDataSource {
    type Query = IdQuery;
    type Model = SiteModel;

    fn type_name(&self) -> &'static str {
        "sevalla_site"
    }

    async fn read(&self, query: IdQuery, cancel: &CancelToken) -> Result<SiteModel> {
        let site = self
            .data
            .client
            .sites()
            .get(&query.id, cancel)
            .await
            .map_err(ProviderError::api("read", "site"))?;
        Ok(SiteModel::from_record(site, &SiteModel::default()))
    }
}
