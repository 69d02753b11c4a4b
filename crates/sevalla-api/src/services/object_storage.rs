//! Object storage buckets
//!
//! Bucket timestamps are RFC 3339 strings, unlike the epoch integers used by
//! the other resources.

use crate::service::{Items, ResourceKind, Service};
use serde::{Deserialize, Serialize};

/// Marker for the object storage endpoints
pub enum ObjectStorages {}

pub type ObjectStorageService = Service<ObjectStorages>;

impl ResourceKind for ObjectStorages {
    const COLLECTION: &'static str = "/object-storage";
    const NAME: &'static str = "object storage";

    type Summary = ObjectStorageSummary;
    type ListResponse = ObjectStorageList;
    type Record = ObjectStorage;
    type GetResponse = ObjectStorageEnvelope;
    type CreateRequest = CreateObjectStorageRequest;
    type Created = ObjectStorage;
    type CreateResponse = ObjectStorageEnvelope;
    type UpdateRequest = UpdateObjectStorageRequest;
    type Updated = ObjectStorage;
    type UpdateResponse = ObjectStorageEnvelope;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStorage {
    pub id: String,
    pub name: String,
    pub region: String,
    /// Total size in bytes
    pub size: i64,
    pub objects: i64,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectStorageSummary {
    pub id: String,
    pub name: String,
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateObjectStorageRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateObjectStorageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateObjectStorageRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStorageEnvelope {
    pub object_storage: ObjectStorage,
}

impl From<ObjectStorageEnvelope> for ObjectStorage {
    fn from(envelope: ObjectStorageEnvelope) -> Self {
        envelope.object_storage
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectStorageList {
    #[serde(default)]
    company: ObjectStorageListCompany,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ObjectStorageListCompany {
    #[serde(default)]
    object_storages: Items<ObjectStorageSummary>,
}

impl From<ObjectStorageList> for Vec<ObjectStorageSummary> {
    fn from(list: ObjectStorageList) -> Self {
        list.company.object_storages.items
    }
}
