//! Per-resource services and their wire models

pub mod applications;
pub mod company;
pub mod databases;
pub mod deployments;
pub mod object_storage;
pub mod operations;
pub mod pipelines;
pub mod sites;
pub mod static_sites;

pub use applications::{
    Application, ApplicationService, ApplicationSummary, BuildType, CreateApplicationRequest,
    EnvVar, UpdateApplicationRequest,
};
pub use company::{CompanyService, CompanyUser};
pub use databases::{
    CreateDatabaseRequest, Database, DatabaseService, DatabaseSummary, DatabaseType,
    RetryPolicy, UpdateDatabaseRequest,
};
pub use deployments::{Deployment, DeploymentService};
pub use object_storage::{
    CreateObjectStorageRequest, ObjectStorage, ObjectStorageService, ObjectStorageSummary,
    UpdateObjectStorageRequest,
};
pub use operations::{Operation, OperationAccepted, OperationService, OperationStatus};
pub use pipelines::{CreatePipelineRequest, Pipeline, PipelineService, UpdatePipelineRequest};
pub use sites::{CreateSiteRequest, Site, SiteService, SiteSummary, UpdateSiteRequest};
pub use static_sites::{
    CreateStaticSiteRequest, StaticSite, StaticSiteService, StaticSiteSummary,
    UpdateStaticSiteRequest,
};
