//! Generic List/Get/Create/Update/Delete service
//!
//! Most Sevalla resources share one shape: a collection path, a `company`
//! query parameter for listing, and `{collection}/{id}` for everything else.
//! What differs is the wire envelope around each payload. A [`ResourceKind`]
//! names those envelopes and how to unwrap them; [`Service`] does the calls.

use crate::cancel::CancelToken;
use crate::client::SevallaClient;
use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use tracing::debug;

/// Wire description of one resource kind
pub trait ResourceKind {
    /// Collection path, e.g. `/applications`
    const COLLECTION: &'static str;

    /// Human readable name used in log lines
    const NAME: &'static str;

    /// Extra query parameters sent with Get
    const GET_QUERY: &'static [(&'static str, &'static str)] = &[];

    type Summary;
    type ListResponse: DeserializeOwned + Into<Vec<Self::Summary>>;

    type Record;
    type GetResponse: DeserializeOwned + Into<Self::Record>;

    type CreateRequest: Serialize + Sync;
    type Created;
    type CreateResponse: DeserializeOwned + Into<Self::Created>;

    type UpdateRequest: Serialize + Sync;
    type Updated;
    type UpdateResponse: DeserializeOwned + Into<Self::Updated>;
}

/// CRUD calls for one resource kind
pub struct Service<K: ResourceKind> {
    client: SevallaClient,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> Clone for Service<K> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

impl<K: ResourceKind> std::fmt::Debug for Service<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("collection", &K::COLLECTION)
            .finish()
    }
}

impl<K: ResourceKind> Service<K> {
    pub fn new(client: SevallaClient) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    /// The transport this service issues calls through
    pub fn client(&self) -> &SevallaClient {
        &self.client
    }

    /// List every entity owned by a company
    pub async fn list(&self, company_id: &str, cancel: &CancelToken) -> Result<Vec<K::Summary>> {
        debug!(kind = K::NAME, company_id, "Listing");
        let response: K::ListResponse = self
            .client
            .get(K::COLLECTION, &[("company", company_id)], cancel)
            .await?;
        Ok(response.into())
    }

    /// Fetch one entity by id
    pub async fn get(&self, id: &str, cancel: &CancelToken) -> Result<K::Record> {
        debug!(kind = K::NAME, id, "Getting");
        let response: K::GetResponse = self
            .client
            .get(&item_path::<K>(id), K::GET_QUERY, cancel)
            .await?;
        Ok(response.into())
    }

    /// Create an entity
    pub async fn create(
        &self,
        request: &K::CreateRequest,
        cancel: &CancelToken,
    ) -> Result<K::Created> {
        debug!(kind = K::NAME, "Creating");
        let response: K::CreateResponse =
            self.client.post(K::COLLECTION, request, cancel).await?;
        Ok(response.into())
    }

    /// Apply a partial update; unset fields are not transmitted
    pub async fn update(
        &self,
        id: &str,
        request: &K::UpdateRequest,
        cancel: &CancelToken,
    ) -> Result<K::Updated> {
        debug!(kind = K::NAME, id, "Updating");
        let response: K::UpdateResponse = self
            .client
            .put(&item_path::<K>(id), request, cancel)
            .await?;
        Ok(response.into())
    }

    /// Delete an entity
    pub async fn delete(&self, id: &str, cancel: &CancelToken) -> Result<()> {
        debug!(kind = K::NAME, id, "Deleting");
        self.client.delete(&item_path::<K>(id), cancel).await
    }
}

fn item_path<K: ResourceKind>(id: &str) -> String {
    format!("{}/{}", K::COLLECTION, urlencoding::encode(id))
}

/// Deserialize helper for `{"items": [...]}` list pages
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Items<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for Items<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}
