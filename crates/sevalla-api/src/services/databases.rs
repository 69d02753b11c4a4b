//! Managed databases
//!
//! Create and update answer with a reduced record (`{"database": {"id"}}`),
//! so the full record is fetched afterwards. A freshly created database is not
//! always readable straight away; [`Service::create_and_fetch`] retries the
//! follow-up read according to a [`RetryPolicy`].

use crate::cancel::CancelToken;
use crate::error::{Result, SevallaError};
use crate::service::{Items, ResourceKind, Service};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Marker for the database endpoints
pub enum Databases {}

pub type DatabaseService = Service<Databases>;

impl ResourceKind for Databases {
    const COLLECTION: &'static str = "/databases";
    const NAME: &'static str = "database";
    const GET_QUERY: &'static [(&'static str, &'static str)] =
        &[("internal", "true"), ("external", "true")];

    type Summary = DatabaseSummary;
    type ListResponse = DatabaseList;
    type Record = Database;
    type GetResponse = DatabaseEnvelope;
    type CreateRequest = CreateDatabaseRequest;
    type Created = DatabaseRef;
    type CreateResponse = DatabaseRefEnvelope;
    type UpdateRequest = UpdateDatabaseRequest;
    type Updated = DatabaseRef;
    type UpdateResponse = DatabaseRefEnvelope;
}

/// Read-after-create retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of reads, including the first
    pub attempts: u32,
    /// Fixed pause between reads
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl Service<Databases> {
    /// Create a database and return its full record.
    ///
    /// Reads the new database up to `retry.attempts` times, pausing
    /// `retry.delay` between reads, and returns the last read error if none
    /// succeed.
    pub async fn create_and_fetch(
        &self,
        request: &CreateDatabaseRequest,
        retry: &RetryPolicy,
        cancel: &CancelToken,
    ) -> Result<Database> {
        let created = self.create(request, cancel).await?;
        debug!(id = %created.id, "Database created, fetching details");

        let attempts = retry.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.get(&created.id, cancel).await {
                Ok(database) => return Ok(database),
                Err(SevallaError::Cancelled) => return Err(SevallaError::Cancelled),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    warn!(
                        id = %created.id,
                        attempt,
                        attempts,
                        error = %e,
                        "New database not readable yet, retrying"
                    );
                }
            }
            attempt += 1;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SevallaError::Cancelled),
                _ = tokio::time::sleep(retry.delay) => {}
            }
        }
    }

    /// Update a database and return its full record
    pub async fn update_and_fetch(
        &self,
        id: &str,
        request: &UpdateDatabaseRequest,
        cancel: &CancelToken,
    ) -> Result<Database> {
        self.update(id, request, cancel).await?;
        self.get(id, cancel).await
    }
}

/// Full database record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
    pub created_at: i64,
    pub memory_limit: i64,
    pub cpu_limit: i64,
    pub storage_size: i64,
    #[serde(rename = "type")]
    pub db_type: String,
    pub version: String,
    pub cluster: DatabaseCluster,
    pub resource_type_name: String,
    pub internal_hostname: Option<String>,
    pub internal_port: Option<String>,
    pub internal_connections: Vec<DatabaseConnection>,
    pub data: DatabaseData,
    pub external_connection_string: Option<String>,
    pub external_hostname: Option<String>,
    pub external_port: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSummary {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
    pub updated_at: i64,
    #[serde(rename = "type")]
    pub db_type: String,
    pub version: String,
    pub resource_type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseCluster {
    pub id: String,
    pub location: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConnection {
    pub id: String,
    #[serde(rename = "type")]
    pub connection_type: String,
}

/// Credentials the platform reports for a database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseData {
    pub db_name: String,
    pub db_password: String,
    pub db_root_password: Option<String>,
    pub db_user: Option<String>,
}

/// Reduced record returned by create and update
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseRef {
    pub id: String,
    pub display_name: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDatabaseRequest {
    pub company_id: String,
    pub location: String,
    /// Size class, `db1` through `db9`
    pub resource_type: String,
    pub display_name: String,
    pub db_name: String,
    pub db_password: String,
    /// Optional for redis, required by the other engines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_user: Option<String>,
    #[serde(rename = "type")]
    pub db_type: DatabaseType,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDatabaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl UpdateDatabaseRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    Postgresql,
    Redis,
    Mariadb,
    Mysql,
}

impl std::str::FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgresql" => Ok(DatabaseType::Postgresql),
            "redis" => Ok(DatabaseType::Redis),
            "mariadb" => Ok(DatabaseType::Mariadb),
            "mysql" => Ok(DatabaseType::Mysql),
            other => Err(format!(
                "unknown database type '{}' (expected postgresql, redis, mariadb or mysql)",
                other
            )),
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseType::Postgresql => write!(f, "postgresql"),
            DatabaseType::Redis => write!(f, "redis"),
            DatabaseType::Mariadb => write!(f, "mariadb"),
            DatabaseType::Mysql => write!(f, "mysql"),
        }
    }
}

/// Valid size classes for `resource_type`
pub const RESOURCE_TYPES: &[&str] = &[
    "db1", "db2", "db3", "db4", "db5", "db6", "db7", "db8", "db9",
];

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseEnvelope {
    pub database: Database,
}

impl From<DatabaseEnvelope> for Database {
    fn from(envelope: DatabaseEnvelope) -> Self {
        envelope.database
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseRefEnvelope {
    pub database: DatabaseRef,
}

impl From<DatabaseRefEnvelope> for DatabaseRef {
    fn from(envelope: DatabaseRefEnvelope) -> Self {
        envelope.database
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseList {
    #[serde(default)]
    company: DatabaseListCompany,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatabaseListCompany {
    #[serde(default)]
    databases: Items<DatabaseSummary>,
}

impl From<DatabaseList> for Vec<DatabaseSummary> {
    fn from(list: DatabaseList) -> Self {
        list.company.databases.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }

    #[test]
    fn test_create_request_wire_shape() {
        let request = CreateDatabaseRequest {
            company_id: "co_1".to_string(),
            location: "us-central1".to_string(),
            resource_type: "db1".to_string(),
            display_name: "orders".to_string(),
            db_name: "orders".to_string(),
            db_password: "s3cret".to_string(),
            db_user: None,
            db_type: DatabaseType::Redis,
            version: "7.2".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "redis");
        assert!(value.get("db_user").is_none());
    }

    #[test]
    fn test_record_with_nullable_connection_fields() {
        let envelope: DatabaseEnvelope = serde_json::from_value(json!({
            "database": {
                "id": "db_1",
                "type": "postgresql",
                "cluster": {"id": "c1", "location": "europe-west3", "display_name": "Frankfurt"},
                "internal_hostname": "db-1.internal",
                "internal_port": "5432",
                "external_hostname": null,
                "data": {"db_name": "app", "db_password": "pw", "db_user": "admin"}
            }
        }))
        .unwrap();
        let db: Database = envelope.into();
        assert_eq!(db.db_type, "postgresql");
        assert_eq!(db.cluster.location, "europe-west3");
        assert_eq!(db.internal_port.as_deref(), Some("5432"));
        assert_eq!(db.external_hostname, None);
        assert_eq!(db.data.db_user.as_deref(), Some("admin"));
    }

    #[test]
    fn test_database_type_parse() {
        assert_eq!("PostgreSQL".parse::<DatabaseType>().unwrap(), DatabaseType::Postgresql);
        assert!("oracle".parse::<DatabaseType>().is_err());
    }
}
