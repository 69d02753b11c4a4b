//! Managed resource adapters
//!
//! One adapter per resource kind. Each maps its model to the kind's service
//! requests and rebuilds the model from every response.

pub mod application;
pub mod database;
pub mod object_storage;
pub mod pipeline;
pub mod site;
pub mod static_site;

pub use application::{ApplicationModel, ApplicationResource};
pub use database::{DatabaseModel, DatabaseResource};
pub use object_storage::{ObjectStorageModel, ObjectStorageResource};
pub use pipeline::{PipelineModel, PipelineResource, PipelineStageModel};
pub use site::{DomainModel, EnvironmentModel, SiteModel, SiteResource};
pub use static_site::{StaticSiteModel, StaticSiteResource};

use crate::error::{ProviderError, Result};
use sevalla_api::{CancelToken, ResourceKind, Service};
use tracing::{error, warn};

/// Turn a 404 on Read into "gone" so the host drops the resource from state
pub(crate) fn found<T>(
    result: sevalla_api::Result<T>,
    kind: &'static str,
    id: &str,
) -> Result<Option<T>> {
    match result {
        Ok(record) => Ok(Some(record)),
        Err(e) if e.is_not_found() => {
            warn!(resource = kind, id, "Resource no longer exists");
            Ok(None)
        }
        Err(e) => Err(ProviderError::api("read", kind)(e)),
    }
}

/// Reject a change to an attribute the platform cannot update in place
pub(crate) fn unchanged<T: PartialEq>(
    plan: &Option<T>,
    prior: &Option<T>,
    attribute: &'static str,
) -> Result<()> {
    match (plan, prior) {
        (Some(planned), Some(current)) if planned != current => {
            Err(ProviderError::InvalidAttribute {
                attribute,
                message: "cannot be changed after creation; replace the resource instead"
                    .to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Apply create-time settings to a resource that was just created.
///
/// If the settings call fails the new resource is deleted again so a failed
/// create leaves nothing behind. The delete ignores cancellation.
pub(crate) async fn apply_settings<K: ResourceKind>(
    service: &Service<K>,
    kind: &'static str,
    id: &str,
    settings: &K::UpdateRequest,
    cancel: &CancelToken,
) -> Result<K::Updated> {
    let source = match service.update(id, settings, cancel).await {
        Ok(updated) => return Ok(updated),
        Err(e) => e,
    };

    warn!(resource = kind, id, error = %source, "Settings failed on new resource, deleting it");
    let removed = match service.delete(id, &CancelToken::never()).await {
        Ok(()) => true,
        Err(e) => {
            error!(resource = kind, id, error = %e, "Unable to delete partially created resource");
            false
        }
    };

    Err(ProviderError::SettingsNotApplied {
        kind,
        id: id.to_string(),
        source,
        removed,
    })
}
