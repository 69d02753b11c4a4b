//! `sevalla_database`
//!
//! Create reads the new database back with the configured retry policy since
//! it may not be readable straight away. The password and user are inputs the
//! platform does not reliably echo, so they are carried over from the prior
//! state on every refresh.

use crate::error::{ProviderError, Result};
use crate::framework::support::{changed, non_empty, required, timestamp};
use crate::framework::{Resource, ResourceModel};
use crate::provider::ProviderData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sevalla_api::{
    CancelToken, CreateDatabaseRequest, Database, DatabaseType, UpdateDatabaseRequest,
};
use tracing::{debug, info};

const KIND: &str = "database";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseModel {
    pub id: Option<String>,
    pub company_id: Option<String>,
    pub location: Option<String>,
    /// Size class, `db1` through `db9`
    pub resource_type: Option<String>,
    pub display_name: Option<String>,
    /// `postgresql`, `redis`, `mariadb` or `mysql`
    #[serde(rename = "type")]
    pub db_type: Option<String>,
    pub version: Option<String>,
    pub db_name: Option<String>,
    pub db_password: Option<String>,
    pub db_user: Option<String>,

    // computed
    pub name: Option<String>,
    pub status: Option<String>,
    pub internal_hostname: Option<String>,
    pub internal_port: Option<String>,
    pub external_hostname: Option<String>,
    pub external_port: Option<String>,
    pub external_connection_string: Option<String>,
    pub created_at: Option<String>,
}

impl ResourceModel for DatabaseModel {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl DatabaseModel {
    /// Rebuild from a record, keeping inputs the record does not carry
    pub fn from_record(db: Database, prior: &DatabaseModel) -> Self {
        DatabaseModel {
            id: Some(db.id),
            company_id: prior.company_id.clone(),
            location: non_empty(&db.cluster.location).or_else(|| prior.location.clone()),
            resource_type: non_empty(&db.resource_type_name)
                .or_else(|| prior.resource_type.clone()),
            display_name: Some(db.display_name),
            db_type: non_empty(&db.db_type).or_else(|| prior.db_type.clone()),
            version: non_empty(&db.version).or_else(|| prior.version.clone()),
            db_name: non_empty(&db.data.db_name).or_else(|| prior.db_name.clone()),
            db_password: prior.db_password.clone(),
            db_user: prior.db_user.clone().or(db.data.db_user),
            name: non_empty(&db.name),
            status: non_empty(&db.status),
            internal_hostname: db.internal_hostname,
            internal_port: db.internal_port,
            external_hostname: db.external_hostname,
            external_port: db.external_port,
            external_connection_string: db.external_connection_string,
            created_at: timestamp(db.created_at),
        }
    }
}

fn parse_type(value: &str) -> Result<DatabaseType> {
    value
        .parse()
        .map_err(|message| ProviderError::InvalidAttribute {
            attribute: "type",
            message,
        })
}

fn validate_resource_type(value: &str) -> Result<()> {
    if sevalla_api::services::databases::RESOURCE_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(ProviderError::InvalidAttribute {
            attribute: "resource_type",
            message: format!("expected one of db1 through db9, got '{}'", value),
        })
    }
}

/// Lifecycle for managed databases
#[derive(Debug, Clone)]
pub struct DatabaseResource {
    data: ProviderData,
}

impl DatabaseResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Resource for DatabaseResource {
    type Model = DatabaseModel;

    fn type_name(&self) -> &'static str {
        "sevalla_database"
    }

    async fn create(&self, plan: DatabaseModel, cancel: &CancelToken) -> Result<DatabaseModel> {
        let resource_type = required(&plan.resource_type, "resource_type")?;
        validate_resource_type(resource_type)?;

        let request = CreateDatabaseRequest {
            company_id: required(&plan.company_id, "company_id")?.to_string(),
            location: required(&plan.location, "location")?.to_string(),
            resource_type: resource_type.to_string(),
            display_name: required(&plan.display_name, "display_name")?.to_string(),
            db_name: required(&plan.db_name, "db_name")?.to_string(),
            db_password: required(&plan.db_password, "db_password")?.to_string(),
            db_user: plan.db_user.clone(),
            db_type: parse_type(required(&plan.db_type, "type")?)?,
            version: required(&plan.version, "version")?.to_string(),
        };

        debug!(
            company_id = %request.company_id,
            display_name = %request.display_name,
            db_type = %request.db_type,
            version = %request.version,
            location = %request.location,
            resource_type = %request.resource_type,
            "Creating database"
        );
        let db = self
            .data
            .client
            .databases()
            .create_and_fetch(&request, &self.data.database_retry, cancel)
            .await
            .map_err(ProviderError::api("create", KIND))?;

        info!(resource = KIND, id = %db.id, "Created database");
        Ok(DatabaseModel::from_record(db, &plan))
    }

    async fn read(&self, state: DatabaseModel, cancel: &CancelToken) -> Result<Option<DatabaseModel>> {
        let id = state.require_id()?;
        let db = super::found(self.data.client.databases().get(id, cancel).await, KIND, id)?;
        Ok(db.map(|db| DatabaseModel::from_record(db, &state)))
    }

    async fn update(
        &self,
        plan: DatabaseModel,
        prior: DatabaseModel,
        cancel: &CancelToken,
    ) -> Result<DatabaseModel> {
        let id = prior.require_id()?;
        super::unchanged(&plan.company_id, &prior.company_id, "company_id")?;
        super::unchanged(&plan.location, &prior.location, "location")?;
        super::unchanged(&plan.db_type, &prior.db_type, "type")?;
        super::unchanged(&plan.version, &prior.version, "version")?;
        super::unchanged(&plan.db_name, &prior.db_name, "db_name")?;

        let request = UpdateDatabaseRequest {
            display_name: changed(&plan.display_name, &prior.display_name),
            resource_type: changed(&plan.resource_type, &prior.resource_type),
        };
        if let Some(resource_type) = &request.resource_type {
            validate_resource_type(resource_type)?;
        }

        let service = self.data.client.databases();
        let db = if request.is_empty() {
            debug!(id, "No database changes to apply");
            service
                .get(id, cancel)
                .await
                .map_err(ProviderError::api("read", KIND))?
        } else {
            service
                .update_and_fetch(id, &request, cancel)
                .await
                .map_err(ProviderError::api("update", KIND))?
        };

        info!(resource = KIND, id, "Updated database");
        let mut carried = prior.clone();
        carried.db_password = plan.db_password.or(prior.db_password.clone());
        carried.db_user = plan.db_user.or(prior.db_user.clone());
        Ok(DatabaseModel::from_record(db, &carried))
    }

    async fn delete(&self, state: DatabaseModel, cancel: &CancelToken) -> Result<()> {
        let id = state.require_id()?;
        self.data
            .client
            .databases()
            .delete(id, cancel)
            .await
            .map_err(ProviderError::api("delete", KIND))?;
        info!(resource = KIND, id, "Deleted database");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_only_inputs_carried_over() {
        let db: Database = serde_json::from_value(json!({
            "id": "db_1",
            "display_name": "orders",
            "type": "postgresql",
            "version": "16",
            "cluster": {"location": "us-central1"},
            "resource_type_name": "db1",
            "data": {"db_name": "orders"}
        }))
        .unwrap();
        let prior = DatabaseModel {
            company_id: Some("co_1".to_string()),
            db_password: Some("s3cret".to_string()),
            db_user: Some("app".to_string()),
            ..Default::default()
        };

        let model = DatabaseModel::from_record(db, &prior);
        assert_eq!(model.db_password.as_deref(), Some("s3cret"));
        assert_eq!(model.db_user.as_deref(), Some("app"));
        assert_eq!(model.company_id.as_deref(), Some("co_1"));
        assert_eq!(model.location.as_deref(), Some("us-central1"));
        assert_eq!(model.db_type.as_deref(), Some("postgresql"));
    }

    #[test]
    fn test_type_attribute_name() {
        let model: DatabaseModel =
            serde_json::from_value(json!({"type": "redis", "version": "7"})).unwrap();
        assert_eq!(model.db_type.as_deref(), Some("redis"));
        assert!(parse_type("oracle").is_err());
    }

    #[test]
    fn test_resource_type_validation() {
        assert!(validate_resource_type("db4").is_ok());
        assert!(validate_resource_type("db10").is_err());
    }
}
