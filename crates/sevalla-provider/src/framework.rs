//! Lifecycle contracts between the host framework and the adapters
//!
//! Adapters implement the typed [`Resource`] and [`DataSource`] traits over
//! their own models. The host drives them through [`DynResource`] and
//! [`DynDataSource`], which exchange plain JSON and are implemented for every
//! typed adapter, so the provider can dispatch by type name.
//!
//! The host owns plan/diff, state storage and ordering. An adapter only maps
//! a model to service requests and a service response back to a model.

use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sevalla_api::CancelToken;

/// State model of a managed resource
pub trait ResourceModel: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Platform id, present once the resource exists
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// The platform id, or an error when the state carries none
    fn require_id(&self) -> Result<&str> {
        self.id()
            .filter(|id| !id.is_empty())
            .ok_or(ProviderError::MissingAttribute("id"))
    }
}

/// Create/Read/Update/Delete/Import for one resource kind
#[async_trait]
pub trait Resource: Send + Sync {
    type Model: ResourceModel;

    /// e.g. `sevalla_application`
    fn type_name(&self) -> &'static str;

    /// Create the resource from a plan and return its state
    async fn create(&self, plan: Self::Model, cancel: &CancelToken) -> Result<Self::Model>;

    /// Refresh state. `None` means the resource no longer exists.
    async fn read(&self, state: Self::Model, cancel: &CancelToken) -> Result<Option<Self::Model>>;

    /// Apply a plan to an existing resource
    async fn update(
        &self,
        plan: Self::Model,
        prior: Self::Model,
        cancel: &CancelToken,
    ) -> Result<Self::Model>;

    async fn delete(&self, state: Self::Model, cancel: &CancelToken) -> Result<()>;

    /// State holding only the imported id; the host reads the rest
    fn import_state(&self, id: &str) -> Self::Model {
        let mut model = Self::Model::default();
        model.set_id(id.to_string());
        model
    }
}

/// Read-only lookup
#[async_trait]
pub trait DataSource: Send + Sync {
    type Query: DeserializeOwned + Send;
    type Model: Serialize + Send;

    fn type_name(&self) -> &'static str;

    async fn read(&self, query: Self::Query, cancel: &CancelToken) -> Result<Self::Model>;
}

/// JSON face of a [`Resource`]
#[async_trait]
pub trait DynResource: Send + Sync {
    fn type_name(&self) -> &'static str;

    async fn create(&self, plan: Value, cancel: &CancelToken) -> Result<Value>;

    async fn read(&self, state: Value, cancel: &CancelToken) -> Result<Option<Value>>;

    async fn update(&self, plan: Value, prior: Value, cancel: &CancelToken) -> Result<Value>;

    async fn delete(&self, state: Value, cancel: &CancelToken) -> Result<()>;

    fn import_state(&self, id: &str) -> Result<Value>;
}

#[async_trait]
impl<R: Resource> DynResource for R {
    fn type_name(&self) -> &'static str {
        Resource::type_name(self)
    }

    async fn create(&self, plan: Value, cancel: &CancelToken) -> Result<Value> {
        let plan: R::Model = serde_json::from_value(plan)?;
        let state = Resource::create(self, plan, cancel).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn read(&self, state: Value, cancel: &CancelToken) -> Result<Option<Value>> {
        let state: R::Model = serde_json::from_value(state)?;
        match Resource::read(self, state, cancel).await? {
            Some(state) => Ok(Some(serde_json::to_value(state)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, plan: Value, prior: Value, cancel: &CancelToken) -> Result<Value> {
        let plan: R::Model = serde_json::from_value(plan)?;
        let prior: R::Model = serde_json::from_value(prior)?;
        let state = Resource::update(self, plan, prior, cancel).await?;
        Ok(serde_json::to_value(state)?)
    }

    async fn delete(&self, state: Value, cancel: &CancelToken) -> Result<()> {
        let state: R::Model = serde_json::from_value(state)?;
        Resource::delete(self, state, cancel).await
    }

    fn import_state(&self, id: &str) -> Result<Value> {
        Ok(serde_json::to_value(Resource::import_state(self, id))?)
    }
}

/// JSON face of a [`DataSource`]
#[async_trait]
pub trait DynDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    async fn read(&self, query: Value, cancel: &CancelToken) -> Result<Value>;
}

#[async_trait]
impl<D: DataSource> DynDataSource for D {
    fn type_name(&self) -> &'static str {
        DataSource::type_name(self)
    }

    async fn read(&self, query: Value, cancel: &CancelToken) -> Result<Value> {
        let query: D::Query = serde_json::from_value(query)?;
        let model = DataSource::read(self, query, cancel).await?;
        Ok(serde_json::to_value(model)?)
    }
}

/// Shared helpers for adapters
pub(crate) mod support {
    use crate::error::{ProviderError, Result};
    use chrono::DateTime;

    /// Require a configured string attribute
    pub fn required<'a>(value: &'a Option<String>, attribute: &'static str) -> Result<&'a str> {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(ProviderError::MissingAttribute(attribute))
    }

    /// Planned value when it differs from the prior state
    pub fn changed<T: PartialEq + Clone>(plan: &Option<T>, prior: &Option<T>) -> Option<T> {
        match plan {
            Some(value) if prior.as_ref() != Some(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Render an epoch-milliseconds timestamp as RFC 3339
    pub fn timestamp(millis: i64) -> Option<String> {
        if millis <= 0 {
            return None;
        }
        DateTime::from_timestamp_millis(millis).map(|t| t.to_rfc3339())
    }

    /// `Some` for non-empty strings
    pub fn non_empty(value: &str) -> Option<String> {
        (!value.is_empty()).then(|| value.to_string())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_changed_only_when_different() {
            let same = Some("a".to_string());
            assert_eq!(changed(&same, &same), None);
            assert_eq!(
                changed(&Some("b".to_string()), &same),
                Some("b".to_string())
            );
            assert_eq!(changed(&None, &same), None);
            assert_eq!(changed(&Some(1), &None), Some(1));
        }

        #[test]
        fn test_timestamp() {
            assert_eq!(
                timestamp(1_700_000_000_000).as_deref(),
                Some("2023-11-14T22:13:20+00:00")
            );
            assert_eq!(timestamp(0), None);
        }

        #[test]
        fn test_required() {
            assert!(required(&None, "company_id").is_err());
            assert!(required(&Some(String::new()), "company_id").is_err());
            assert_eq!(required(&Some("co_1".to_string()), "company_id").unwrap(), "co_1");
        }
    }
}
