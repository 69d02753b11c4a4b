//! `sevalla_static_site` lookup

use super::IdQuery;
use crate::error::{ProviderError, Result};
use crate::framework::DataSource;
use crate::provider::ProviderData;
use crate::resources::StaticSiteModel;
use async_trait::async_trait;
use sevalla_api::CancelToken;

#[derive(Debug, Clone)]
pub struct StaticSiteDataSource {
    data: ProviderData,
}

impl StaticSiteDataSource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DataSource for StaticSiteDataSource {
    type Query = IdQuery;
    type Model = StaticSiteModel;

    fn type_name(&self) -> &'static str {
        "sevalla_static_site"
    }

    async fn read(&self, query: IdQuery, cancel: &CancelToken) -> Result<StaticSiteModel> {
        let site = self
            .data
            .client
            .static_sites()
            .get(&query.id, cancel)
            .await
            .map_err(ProviderError::api("read", "static site"))?;
        Ok(StaticSiteModel::from_record(site, &StaticSiteModel::default()))
    }
}
