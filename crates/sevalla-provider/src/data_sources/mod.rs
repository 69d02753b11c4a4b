//! Read-only lookups
//!
//! Lookups by id return the same model the matching resource keeps in state.
//! A lookup that finds nothing is an error.

pub mod application;
pub mod company_users;
pub mod database;
pub mod object_storage;
pub mod pipeline;
pub mod site;
pub mod static_site;

pub use application::ApplicationDataSource;
pub use company_users::{
    CompanyUserModel, CompanyUsersDataSource, CompanyUsersModel, CompanyUsersQuery,
};
pub use database::DatabaseDataSource;
pub use object_storage::ObjectStorageDataSource;
pub use pipeline::PipelineDataSource;
pub use site::SiteDataSource;
pub use static_site::StaticSiteDataSource;

use serde::Deserialize;

/// Lookup by platform id
#[derive(Debug, Clone, Deserialize)]
pub struct IdQuery {
    pub id: String,
}
