//! Provider configuration and the type registry
//!
//! [`SevallaProvider::configure`] resolves the provider block once, builds
//! the shared client, and hands every adapter the same [`ProviderData`].

use crate::config::ProviderConfig;
use crate::data_sources::{
    ApplicationDataSource, CompanyUsersDataSource, DatabaseDataSource, ObjectStorageDataSource,
    PipelineDataSource, SiteDataSource, StaticSiteDataSource,
};
use crate::error::{ProviderError, Result};
use crate::framework::{DynDataSource, DynResource};
use crate::resources::{
    ApplicationResource, DatabaseResource, ObjectStorageResource, PipelineResource, SiteResource,
    StaticSiteResource,
};
use sevalla_api::{PollConfig, RetryPolicy, SevallaClient};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything an adapter needs, built once per configuration
#[derive(Debug, Clone)]
pub struct ProviderData {
    pub client: SevallaClient,
    pub poll: PollConfig,
    pub database_retry: RetryPolicy,
}

/// Provider entry point
pub struct SevallaProvider;

impl SevallaProvider {
    /// Validate configuration and build the shared client.
    ///
    /// Fails when no token can be found in configuration or `SEVALLA_TOKEN`.
    pub fn configure(config: &ProviderConfig) -> Result<ConfiguredProvider> {
        let client_config = config.client_config()?;
        debug!(base_url = %client_config.base_url, "Creating Sevalla client");

        let client = SevallaClient::new(client_config).map_err(ProviderError::Client)?;
        let data = ProviderData {
            client,
            poll: config.poll_config(),
            database_retry: config.retry_policy(),
        };

        info!(base_url = %data.client.base_url(), "Configured Sevalla client");
        Ok(ConfiguredProvider::new(data))
    }
}

/// A configured provider dispatching by type name
pub struct ConfiguredProvider {
    data: ProviderData,
    resources: BTreeMap<&'static str, Arc<dyn DynResource>>,
    data_sources: BTreeMap<&'static str, Arc<dyn DynDataSource>>,
}

impl ConfiguredProvider {
    fn new(data: ProviderData) -> Self {
        let resources: Vec<Arc<dyn DynResource>> = vec![
            Arc::new(ApplicationResource::new(data.clone())),
            Arc::new(DatabaseResource::new(data.clone())),
            Arc::new(StaticSiteResource::new(data.clone())),
            Arc::new(ObjectStorageResource::new(data.clone())),
            Arc::new(PipelineResource::new(data.clone())),
            Arc::new(SiteResource::new(data.clone())),
        ];
        let data_sources: Vec<Arc<dyn DynDataSource>> = vec![
            Arc::new(ApplicationDataSource::new(data.clone())),
            Arc::new(DatabaseDataSource::new(data.clone())),
            Arc::new(StaticSiteDataSource::new(data.clone())),
            Arc::new(ObjectStorageDataSource::new(data.clone())),
            Arc::new(PipelineDataSource::new(data.clone())),
            Arc::new(SiteDataSource::new(data.clone())),
            Arc::new(CompanyUsersDataSource::new(data.clone())),
        ];

        Self {
            resources: resources.into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
            data,
        }
    }

    pub fn data(&self) -> &ProviderData {
        &self.data
    }

    pub fn client(&self) -> &SevallaClient {
        &self.data.client
    }

    /// Resource adapter registered under `type_name`
    pub fn resource(&self, type_name: &str) -> Result<Arc<dyn DynResource>> {
        self.resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }

    /// Lookup registered under `type_name`
    pub fn data_source(&self, type_name: &str) -> Result<Arc<dyn DynDataSource>> {
        self.data_sources
            .get(type_name)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownDataSourceType(type_name.to_string()))
    }

    /// Registered resource type names, sorted
    pub fn resource_types(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    /// Registered lookup type names, sorted
    pub fn data_source_types(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }
}
