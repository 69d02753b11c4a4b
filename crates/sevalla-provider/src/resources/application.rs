//! `sevalla_application`
//!
//! The platform's create call only takes the repository and display name.
//! Build and runtime settings given at create time are applied with a
//! follow-up update before the state is returned.

use crate::error::{ProviderError, Result};
use crate::framework::support::{changed, non_empty, required, timestamp};
use crate::framework::{Resource, ResourceModel};
use crate::provider::ProviderData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sevalla_api::{
    Application, BuildType, CancelToken, CreateApplicationRequest, EnvVar,
    UpdateApplicationRequest,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

const KIND: &str = "application";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationModel {
    pub id: Option<String>,
    pub company_id: Option<String>,
    pub display_name: Option<String>,
    pub repo_url: Option<String>,
    pub default_branch: Option<String>,
    pub auto_deploy: Option<bool>,
    pub build_path: Option<String>,
    /// `dockerfile`, `pack` or `nixpacks`
    pub build_type: Option<String>,
    pub node_version: Option<String>,
    pub dockerfile_path: Option<String>,
    pub docker_compose_file: Option<String>,
    pub start_command: Option<String>,
    pub install_command: Option<String>,
    pub environment: Option<BTreeMap<String, String>>,

    // computed
    pub name: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ResourceModel for ApplicationModel {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

impl From<Application> for ApplicationModel {
    fn from(app: Application) -> Self {
        let environment = (!app.environment_variables.is_empty()).then(|| {
            app.environment_variables
                .into_iter()
                .map(|var| (var.key, var.value))
                .collect()
        });

        ApplicationModel {
            id: Some(app.id),
            company_id: non_empty(&app.company_id),
            display_name: Some(app.display_name),
            repo_url: non_empty(&app.repo_url),
            default_branch: non_empty(&app.default_branch),
            auto_deploy: Some(app.auto_deploy),
            build_path: non_empty(&app.build_path),
            build_type: non_empty(&app.build_type),
            node_version: app.node_version,
            dockerfile_path: app.dockerfile_path,
            docker_compose_file: app.docker_compose_file,
            start_command: app.start_command,
            install_command: app.install_command,
            environment,
            name: non_empty(&app.name),
            status: non_empty(&app.status),
            created_at: timestamp(app.created_at),
            updated_at: timestamp(app.updated_at),
        }
    }
}

impl ApplicationModel {
    /// Settings the create call cannot carry
    fn settings(&self) -> Result<UpdateApplicationRequest> {
        Ok(UpdateApplicationRequest {
            auto_deploy: self.auto_deploy,
            build_path: self.build_path.clone(),
            build_type: parse_build_type(&self.build_type)?,
            node_version: self.node_version.clone(),
            dockerfile_path: self.dockerfile_path.clone(),
            docker_compose_file: self.docker_compose_file.clone(),
            start_command: self.start_command.clone(),
            install_command: self.install_command.clone(),
            environment_variables: self
                .environment
                .as_ref()
                .filter(|environment| !environment.is_empty())
                .map(env_vars),
            ..Default::default()
        })
    }

    /// Keep declared values the record cannot express: the owning company
    /// when it is omitted, and an empty environment map (read back as unset)
    fn carry_declared(
        mut self,
        company_id: &Option<String>,
        environment: &Option<BTreeMap<String, String>>,
    ) -> Self {
        if self.company_id.is_none() {
            self.company_id = company_id.clone();
        }
        if self.environment.is_none() && environment.as_ref().is_some_and(BTreeMap::is_empty) {
            self.environment = Some(BTreeMap::new());
        }
        self
    }
}

fn parse_build_type(value: &Option<String>) -> Result<Option<BuildType>> {
    value
        .as_deref()
        .map(|v| {
            v.parse().map_err(|message| ProviderError::InvalidAttribute {
                attribute: "build_type",
                message,
            })
        })
        .transpose()
}

/// Variables to send when the planned environment differs from the current one.
/// An unset current environment compares equal to an empty plan; an empty plan
/// against a populated one clears it.
fn environment_change(
    plan: &Option<BTreeMap<String, String>>,
    prior: &Option<BTreeMap<String, String>>,
) -> Option<Vec<EnvVar>> {
    let planned = plan.as_ref()?;
    let unchanged = match prior {
        Some(current) => current == planned,
        None => planned.is_empty(),
    };
    (!unchanged).then(|| env_vars(planned))
}

fn env_vars(environment: &BTreeMap<String, String>) -> Vec<EnvVar> {
    environment
        .iter()
        .map(|(key, value)| EnvVar {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Lifecycle for applications
#[derive(Debug, Clone)]
pub struct ApplicationResource {
    data: ProviderData,
}

impl ApplicationResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Resource for ApplicationResource {
    type Model = ApplicationModel;

    fn type_name(&self) -> &'static str {
        "sevalla_application"
    }

    async fn create(&self, plan: ApplicationModel, cancel: &CancelToken) -> Result<ApplicationModel> {
        let request = CreateApplicationRequest {
            company_id: required(&plan.company_id, "company_id")?.to_string(),
            display_name: required(&plan.display_name, "display_name")?.to_string(),
            repo_url: required(&plan.repo_url, "repo_url")?.to_string(),
            branch: plan.default_branch.clone(),
        };
        let settings = plan.settings()?;

        debug!(
            company_id = %request.company_id,
            display_name = %request.display_name,
            "Creating application"
        );
        let service = self.data.client.applications();
        let mut app = service
            .create(&request, cancel)
            .await
            .map_err(ProviderError::api("create", KIND))?;

        if !settings.is_empty() {
            debug!(id = %app.id, "Applying application settings");
            app = super::apply_settings(&service, KIND, &app.id, &settings, cancel).await?;
        }

        info!(resource = KIND, id = %app.id, "Created application");
        Ok(ApplicationModel::from(app).carry_declared(&plan.company_id, &plan.environment))
    }

    async fn read(
        &self,
        state: ApplicationModel,
        cancel: &CancelToken,
    ) -> Result<Option<ApplicationModel>> {
        let id = state.require_id()?;
        let app = super::found(
            self.data.client.applications().get(id, cancel).await,
            KIND,
            id,
        )?;
        Ok(app.map(|app| {
            ApplicationModel::from(app).carry_declared(&state.company_id, &state.environment)
        }))
    }

    async fn update(
        &self,
        plan: ApplicationModel,
        prior: ApplicationModel,
        cancel: &CancelToken,
    ) -> Result<ApplicationModel> {
        let id = prior.require_id()?;
        super::unchanged(&plan.company_id, &prior.company_id, "company_id")?;
        super::unchanged(&plan.repo_url, &prior.repo_url, "repo_url")?;

        let request = UpdateApplicationRequest {
            display_name: changed(&plan.display_name, &prior.display_name),
            default_branch: changed(&plan.default_branch, &prior.default_branch),
            auto_deploy: changed(&plan.auto_deploy, &prior.auto_deploy),
            build_path: changed(&plan.build_path, &prior.build_path),
            build_type: parse_build_type(&changed(&plan.build_type, &prior.build_type))?,
            node_version: changed(&plan.node_version, &prior.node_version),
            dockerfile_path: changed(&plan.dockerfile_path, &prior.dockerfile_path),
            docker_compose_file: changed(&plan.docker_compose_file, &prior.docker_compose_file),
            start_command: changed(&plan.start_command, &prior.start_command),
            install_command: changed(&plan.install_command, &prior.install_command),
            environment_variables: environment_change(&plan.environment, &prior.environment),
            pack_config: None,
        };

        let service = self.data.client.applications();
        let app = if request.is_empty() {
            debug!(id, "No application changes to apply");
            service
                .get(id, cancel)
                .await
                .map_err(ProviderError::api("read", KIND))?
        } else {
            service
                .update(id, &request, cancel)
                .await
                .map_err(ProviderError::api("update", KIND))?
        };

        info!(resource = KIND, id, "Updated application");
        Ok(ApplicationModel::from(app).carry_declared(&prior.company_id, &plan.environment))
    }

    async fn delete(&self, state: ApplicationModel, cancel: &CancelToken) -> Result<()> {
        let id = state.require_id()?;
        self.data
            .client
            .applications()
            .delete(id, cancel)
            .await
            .map_err(ProviderError::api("delete", KIND))?;
        info!(resource = KIND, id, "Deleted application");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_model_from_record() {
        let app: Application = serde_json::from_value(json!({
            "id": "app_1",
            "name": "svc-a-x1",
            "display_name": "svc-a",
            "company_id": "co_1",
            "repo_url": "https://github.com/acme/svc-a",
            "default_branch": "main",
            "build_type": "dockerfile",
            "environment_variables": [{"key": "PORT", "value": "8080"}],
            "created_at": 1700000000000_i64
        }))
        .unwrap();

        let model = ApplicationModel::from(app);
        assert_eq!(model.id.as_deref(), Some("app_1"));
        assert_eq!(model.build_type.as_deref(), Some("dockerfile"));
        assert_eq!(model.environment.unwrap()["PORT"], "8080");
        assert_eq!(model.created_at.as_deref(), Some("2023-11-14T22:13:20+00:00"));
        assert_eq!(model.updated_at, None);
    }

    #[test]
    fn test_settings_only_include_set_fields() {
        let plan = ApplicationModel {
            start_command: Some("npm start".to_string()),
            build_type: Some("nixpacks".to_string()),
            ..Default::default()
        };
        let settings = plan.settings().unwrap();
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({"build_type": "nixpacks", "start_command": "npm start"})
        );
        assert!(ApplicationModel::default().settings().unwrap().is_empty());
    }

    #[test]
    fn test_empty_environment_is_unset() {
        let empty = Some(BTreeMap::new());
        let populated = Some(BTreeMap::from([("PORT".to_string(), "8080".to_string())]));

        let plan = ApplicationModel {
            environment: empty.clone(),
            ..Default::default()
        };
        assert!(plan.settings().unwrap().is_empty());

        assert_eq!(environment_change(&empty, &None), None);
        assert_eq!(environment_change(&None, &populated), None);
        assert_eq!(environment_change(&populated, &populated), None);
        assert_eq!(environment_change(&empty, &populated), Some(vec![]));
        assert_eq!(
            environment_change(&populated, &empty).map(|vars| vars.len()),
            Some(1)
        );

        let read_back = ApplicationModel {
            id: Some("app_1".to_string()),
            ..Default::default()
        }
        .carry_declared(&Some("co_1".to_string()), &empty);
        assert_eq!(read_back.environment, empty);
        assert_eq!(read_back.company_id.as_deref(), Some("co_1"));
    }

    #[test]
    fn test_invalid_build_type() {
        let plan = ApplicationModel {
            build_type: Some("makefile".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            plan.settings(),
            Err(ProviderError::InvalidAttribute {
                attribute: "build_type",
                ..
            })
        ));
    }
}
