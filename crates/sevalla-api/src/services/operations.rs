//! Asynchronous operations
//!
//! Status strings are matched case-insensitively; anything the client does
//! not recognise is treated as still in progress.

use crate::cancel::CancelToken;
use crate::client::SevallaClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Acknowledgement returned by endpoints that start an operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationAccepted {
    pub operation_id: String,
    pub message: String,
    pub status: i64,
}

/// Snapshot of an operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    pub id: String,
    pub status: String,
    /// e.g. `create_site`, `delete_database`
    #[serde(rename = "type")]
    pub operation_type: String,
    pub resource_id: Option<String>,
    /// 0-100
    pub progress: u32,
    pub message: String,
    pub created_at: i64,
    pub completed_at: Option<i64>,
    pub error: Option<String>,
    pub data: Option<serde_json::Value>,
}

/// Lifecycle state of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl OperationStatus {
    /// Whether no further transition will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Completed | OperationStatus::Failed)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationStatus::Pending => write!(f, "PENDING"),
            OperationStatus::Running => write!(f, "RUNNING"),
            OperationStatus::Completed => write!(f, "COMPLETED"),
            OperationStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl Operation {
    pub fn state(&self) -> OperationStatus {
        match self.status.to_lowercase().as_str() {
            "completed" => OperationStatus::Completed,
            "failed" => OperationStatus::Failed,
            "running" => OperationStatus::Running,
            _ => OperationStatus::Pending,
        }
    }

    /// Id of the resource the operation produced.
    ///
    /// Prefers `resource_id`, then a `site_id` string in `data`.
    pub fn produced_resource_id(&self) -> Option<String> {
        self.resource_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.data
                    .as_ref()
                    .and_then(|data| data.get("site_id"))
                    .and_then(|id| id.as_str())
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
            })
    }
}

/// Operation status lookups
#[derive(Debug, Clone)]
pub struct OperationService {
    client: SevallaClient,
}

impl OperationService {
    pub fn new(client: SevallaClient) -> Self {
        Self { client }
    }

    pub async fn get_status(&self, operation_id: &str, cancel: &CancelToken) -> Result<Operation> {
        let path = format!("/operations/{}", urlencoding::encode(operation_id));
        self.client.get(&path, &[], cancel).await
    }
}
