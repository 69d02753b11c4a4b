//! Error handling for the provider
//!
//! API failures are wrapped with the lifecycle step and resource kind they
//! interrupted ("Unable to create database, got error: ..."), keeping the
//! underlying [`SevallaError`] reachable for classification.

use crate::config::ConfigError;
use sevalla_api::SevallaError;
use thiserror::Error;

/// Errors returned by adapters, lookups and provider configuration
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A service call failed during a lifecycle step
    #[error("Unable to {action} {kind}, got error: {source}")]
    Api {
        action: &'static str,
        kind: &'static str,
        #[source]
        source: SevallaError,
    },

    /// A resource was created but its follow-up settings could not be applied
    #[error(
        "Unable to apply settings to new {kind} '{id}', got error: {source} ({})",
        cleanup_note(.removed)
    )]
    SettingsNotApplied {
        kind: &'static str,
        id: String,
        #[source]
        source: SevallaError,
        removed: bool,
    },

    /// Waiting for an asynchronous create failed, timed out or was cancelled
    #[error("Site creation operation failed: {0}")]
    Operation(#[source] SevallaError),

    /// A required input was not supplied
    #[error("Missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    /// An input was supplied but cannot be used
    #[error("Invalid value for '{attribute}': {message}")]
    InvalidAttribute {
        attribute: &'static str,
        message: String,
    },

    #[error("Unknown resource type '{0}'")]
    UnknownResourceType(String),

    #[error("Unknown data source type '{0}'")]
    UnknownDataSourceType(String),

    /// Plan, state or query JSON did not match the type's model
    #[error("Invalid resource data: {0}")]
    State(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The transport could not be built from the resolved configuration
    #[error("Unable to create Sevalla client: {0}")]
    Client(#[source] SevallaError),
}

fn cleanup_note(removed: &bool) -> &'static str {
    if *removed {
        "it has been deleted again"
    } else {
        "it could not be deleted and must be removed by hand"
    }
}

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

impl ProviderError {
    /// Wrap a service failure with lifecycle context.
    ///
    /// ```rust
    /// use sevalla_provider::ProviderError;
    /// use sevalla_api::SevallaError;
    ///
    /// let err = ProviderError::api("read", "application")(SevallaError::Api {
    ///     status: 404,
    ///     message: "Application not found".to_string(),
    /// });
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Unable to read application, got error: HTTP 404: Application not found"
    /// );
    /// ```
    pub fn api(action: &'static str, kind: &'static str) -> impl FnOnce(SevallaError) -> Self {
        move |source| ProviderError::Api {
            action,
            kind,
            source,
        }
    }

    /// The underlying API error, if any
    pub fn api_error(&self) -> Option<&SevallaError> {
        match self {
            ProviderError::Api { source, .. }
            | ProviderError::SettingsNotApplied { source, .. }
            | ProviderError::Operation(source)
            | ProviderError::Client(source) => Some(source),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(SevallaError::is_not_found)
    }

    /// Returns true if the call was cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.api_error().is_some_and(SevallaError::is_cancelled)
    }

    /// Returns true if a request or operation wait timed out
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.api_error().is_some_and(SevallaError::is_timeout)
    }
}
