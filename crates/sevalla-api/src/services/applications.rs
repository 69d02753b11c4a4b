//! Applications
//!
//! Git-backed compute applications. Records arrive wrapped in `{"app": ...}`
//! and list pages under `company.apps.items`.

use crate::service::{Items, ResourceKind, Service};
use serde::{Deserialize, Serialize};

/// Marker for the application endpoints
pub enum Applications {}

pub type ApplicationService = Service<Applications>;

impl ResourceKind for Applications {
    const COLLECTION: &'static str = "/applications";
    const NAME: &'static str = "application";

    type Summary = ApplicationSummary;
    type ListResponse = ApplicationList;
    type Record = Application;
    type GetResponse = ApplicationEnvelope;
    type CreateRequest = CreateApplicationRequest;
    type Created = Application;
    type CreateResponse = ApplicationEnvelope;
    type UpdateRequest = UpdateApplicationRequest;
    type Updated = Application;
    type UpdateResponse = ApplicationEnvelope;
}

/// Full application record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
    pub company_id: String,
    pub repo_url: String,
    pub default_branch: String,
    pub auto_deploy: bool,
    pub build_path: String,
    pub build_type: String,
    pub node_version: Option<String>,
    pub dockerfile_path: Option<String>,
    pub docker_compose_file: Option<String>,
    pub start_command: Option<String>,
    pub install_command: Option<String>,
    pub environment_variables: Vec<EnvVar>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deployments: Vec<AppDeployment>,
    pub processes: Vec<AppProcess>,
    pub internal_connections: Vec<InternalConnection>,
}

/// Application entry in a list page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSummary {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppDeployment {
    pub id: String,
    pub status: String,
    pub branch: String,
    pub repo_url: String,
    pub commit_hash: Option<String>,
    pub commit_message: Option<String>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppProcess {
    pub id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub process_type: String,
    pub display_name: String,
    pub scaling_strategy: Option<ScalingStrategy>,
    pub resource_type_name: String,
    pub entrypoint: String,
}

/// `manual` or `horizontal`, with a type-specific config object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingStrategy {
    #[serde(rename = "type")]
    pub strategy_type: String,
    pub config: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalConnection {
    pub id: String,
    pub target_type: String,
    pub target_id: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplicationRequest {
    pub company_id: String,
    pub display_name: String,
    pub repo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateApplicationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_type: Option<BuildType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_compose_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_config: Option<PackConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_variables: Option<Vec<EnvVar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
}

impl UpdateApplicationRequest {
    /// True when no field would be transmitted
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackConfig {
    pub builder: String,
}

/// How the platform builds an application image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Dockerfile,
    Pack,
    Nixpacks,
}

impl std::str::FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dockerfile" => Ok(BuildType::Dockerfile),
            "pack" => Ok(BuildType::Pack),
            "nixpacks" => Ok(BuildType::Nixpacks),
            other => Err(format!(
                "unknown build type '{}' (expected dockerfile, pack or nixpacks)",
                other
            )),
        }
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildType::Dockerfile => write!(f, "dockerfile"),
            BuildType::Pack => write!(f, "pack"),
            BuildType::Nixpacks => write!(f, "nixpacks"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationEnvelope {
    pub app: Application,
}

impl From<ApplicationEnvelope> for Application {
    fn from(envelope: ApplicationEnvelope) -> Self {
        envelope.app
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationList {
    #[serde(default)]
    company: ApplicationListCompany,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApplicationListCompany {
    #[serde(default)]
    apps: Items<ApplicationSummary>,
}

impl From<ApplicationList> for Vec<ApplicationSummary> {
    fn from(list: ApplicationList) -> Self {
        list.company.apps.items
    }
}
