//! Authenticated JSON transport for the Sevalla API
//!
//! Every call is a single round trip: bearer token and JSON headers are
//! attached, the body (if any) is serialized, and the response is either
//! decoded into the caller's type or turned into a [`SevallaError`]. Nothing
//! is retried here.

use crate::cancel::CancelToken;
use crate::error::{Result, SevallaError};
use crate::services::{
    ApplicationService, CompanyService, DatabaseService, DeploymentService,
    ObjectStorageService, OperationService, PipelineService, SiteService, StaticSiteService,
};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.sevalla.com/v2";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`SevallaClient`]
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for the default endpoint and timeout
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Shared HTTP client for the Sevalla API
///
/// Cheap to clone; clones share one connection pool and may be used
/// concurrently.
#[derive(Clone)]
pub struct SevallaClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl fmt::Debug for SevallaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SevallaClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SevallaClient {
    /// Build a client from connection settings
    pub fn new(config: ClientConfig) -> Result<Self> {
        let trimmed = config.base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed).map_err(|e| SevallaError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(SevallaError::InvalidBaseUrl {
                url: config.base_url,
                reason: format!("unsupported scheme '{}'", base_url.scheme()),
            });
        }

        let timeout = if config.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            config.timeout
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("sevalla-api/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: config.token,
        })
    }

    /// The endpoint requests are issued against
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn applications(&self) -> ApplicationService {
        ApplicationService::new(self.clone())
    }

    pub fn databases(&self) -> DatabaseService {
        DatabaseService::new(self.clone())
    }

    pub fn static_sites(&self) -> StaticSiteService {
        StaticSiteService::new(self.clone())
    }

    pub fn object_storage(&self) -> ObjectStorageService {
        ObjectStorageService::new(self.clone())
    }

    pub fn pipelines(&self) -> PipelineService {
        PipelineService::new(self.clone())
    }

    pub fn sites(&self) -> SiteService {
        SiteService::new(self.clone())
    }

    pub fn deployments(&self) -> DeploymentService {
        DeploymentService::new(self.clone())
    }

    pub fn company(&self) -> CompanyService {
        CompanyService::new(self.clone())
    }

    pub fn operations(&self) -> OperationService {
        OperationService::new(self.clone())
    }

    /// GET `path` and decode the response
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        cancel: &CancelToken,
    ) -> Result<T> {
        let body = self.execute(Method::GET, path, query, None, cancel).await?;
        decode(&body)
    }

    /// POST a JSON body to `path` and decode the response
    pub async fn post<B, T>(&self, path: &str, body: &B, cancel: &CancelToken) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)?;
        let body = self
            .execute(Method::POST, path, &[], Some(payload), cancel)
            .await?;
        decode(&body)
    }

    /// PUT a JSON body to `path` and decode the response
    pub async fn put<B, T>(&self, path: &str, body: &B, cancel: &CancelToken) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)?;
        let body = self
            .execute(Method::PUT, path, &[], Some(payload), cancel)
            .await?;
        decode(&body)
    }

    /// DELETE `path`; the response body is ignored
    pub async fn delete(&self, path: &str, cancel: &CancelToken) -> Result<()> {
        self.execute(Method::DELETE, path, &[], None, cancel)
            .await
            .map(|_| ())
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|e| SevallaError::InvalidBaseUrl {
            url: joined.clone(),
            reason: e.to_string(),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Vec<u8>>,
        cancel: &CancelToken,
    ) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(SevallaError::Cancelled);
        }

        let url = self.url(path, query)?;
        debug!(method = %method, url = %url, "Sending request");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(payload) = body {
            trace!(body = %String::from_utf8_lossy(&payload), "Request body");
            request = request.body(payload);
        }

        let response = cancellable(cancel, request.send()).await??;
        let status = response.status();
        let text = cancellable(cancel, response.text()).await??;

        debug!(method = %method, url = %url, status = status.as_u16(), "Received response");
        trace!(body = %text, "Response body");

        if status.as_u16() >= 400 {
            return Err(SevallaError::from_response(status.as_u16(), &text));
        }

        Ok(text)
    }
}

/// Race `future` against cancellation of `cancel`
async fn cancellable<F: Future>(cancel: &CancelToken, future: F) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SevallaError::Cancelled),
        output = future => Ok(output),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> SevallaClient {
        SevallaClient::new(ClientConfig::new("token").with_base_url(base)).unwrap()
    }

    #[test]
    fn test_url_joins_path_and_query() {
        let client = client("https://api.sevalla.com/v2/");
        let url = client
            .url("/databases/db_1", &[("internal", "true"), ("external", "true")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.sevalla.com/v2/databases/db_1?internal=true&external=true"
        );
    }

    #[test]
    fn test_url_without_query_has_no_question_mark() {
        let client = client("https://api.sevalla.com/v2");
        let url = client.url("/applications", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.sevalla.com/v2/applications");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = SevallaClient::new(ClientConfig::new("token").with_base_url("not a url"))
            .unwrap_err();
        assert!(matches!(err, SevallaError::InvalidBaseUrl { .. }));

        let err = SevallaClient::new(ClientConfig::new("token").with_base_url("mailto:a@b.c"))
            .unwrap_err();
        assert!(matches!(err, SevallaError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = ClientConfig::new("super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));
        let client = SevallaClient::new(config).unwrap();
        assert!(!format!("{:?}", client).contains("super-secret"));
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("t");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
