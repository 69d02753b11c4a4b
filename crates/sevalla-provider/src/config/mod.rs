//! Provider configuration
//!
//! - [`ProviderConfig`]: the provider block (token, endpoint, tunables)
//! - [`Config`]: named profiles stored as TOML, with `${VAR}` expansion
//! - Environment fallback for the token and endpoint

#![allow(clippy::module_inception)]

pub mod config;
pub mod credential;
pub mod error;

pub use config::{Config, ProviderConfig};
pub use credential::{BASE_URL_ENV, TOKEN_ENV};
pub use error::{ConfigError, Result};
