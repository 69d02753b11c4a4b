//! # sevalla-provider
//!
//! Declarative management of Sevalla resources.
//!
//! A host framework owns planning, state and ordering. This crate supplies
//! what sits beneath its lifecycle hooks:
//!
//! - [`config`] - the provider block, profile files and environment fallback
//! - [`SevallaProvider::configure`] - builds the shared client once and
//!   registers every adapter by type name
//! - [`resources`] - Create/Read/Update/Delete/Import per resource kind
//! - [`data_sources`] - read-only lookups
//!
//! ## Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use sevalla_api::CancelToken;
//! use sevalla_provider::{ProviderConfig, SevallaProvider};
//!
//! # async fn example() -> sevalla_provider::Result<()> {
//! let provider = SevallaProvider::configure(&ProviderConfig::default())?;
//! let cancel = CancelToken::never();
//!
//! let apps = provider.resource("sevalla_application")?;
//! let state = apps
//!     .create(
//!         json!({
//!             "company_id": "co_1",
//!             "display_name": "svc-a",
//!             "repo_url": "https://github.com/acme/svc-a"
//!         }),
//!         &cancel,
//!     )
//!     .await?;
//! println!("{}", state["id"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data_sources;
pub mod error;
pub mod framework;
pub mod provider;
pub mod resources;

pub use config::{Config, ConfigError, ProviderConfig};
pub use error::{ProviderError, Result};
pub use framework::{DataSource, DynDataSource, DynResource, Resource, ResourceModel};
pub use provider::{ConfiguredProvider, ProviderData, SevallaProvider};
