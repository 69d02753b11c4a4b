//! `sevalla_application` lookup

use super::IdQuery;
use crate::error::{ProviderError, Result};
use crate::framework::DataSource;
use crate::provider::ProviderData;
use crate::resources::ApplicationModel;
use async_trait::async_trait;
use sevalla_api::CancelToken;

#[derive(Debug, Clone)]
pub struct ApplicationDataSource {
    data: ProviderData,
}

impl ApplicationDataSource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DataSource for ApplicationDataSource {
    type Query = IdQuery;
    type Model = ApplicationModel;

    fn type_name(&self) -> &'static str {
        "sevalla_application"
    }

    async fn read(&self, query: IdQuery, cancel: &CancelToken) -> Result<ApplicationModel> {
        let app = self
            .data
            .client
            .applications()
            .get(&query.id, cancel)
            .await
            .map_err(ProviderError::api("read", "application"))?;
        Ok(app.into())
    }
}
