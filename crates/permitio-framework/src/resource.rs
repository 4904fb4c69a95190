//! Resource and data source traits.
//!
//! Adapters implement [`Resource`] or [`DataSource`] against their own typed
//! model. The registry stores them behind [`DynResource`] / [`DynDataSource`],
//! which speak raw JSON objects so the host can drive any type by name.

use crate::diag::{DiagResult, Diagnostic, Diagnostics};
use crate::schema::Schema;
use crate::validate::ConfigValidator;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;

/// A managed resource type.
///
/// `create` and `update` receive the planned model and return the state to
/// store. Unknown values in the planned model must be resolved before return.
#[async_trait]
pub trait Resource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Suffix appended to the provider type name, e.g. `role`.
    fn type_suffix(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Cross-attribute rules checked during validation.
    fn config_validators(&self) -> Vec<ConfigValidator> {
        Vec::new()
    }

    /// Type-specific checks on the decoded configuration.
    fn validate_config(&self, _config: &Self::Model) -> DiagResult<()> {
        Ok(())
    }

    async fn create(&self, plan: Self::Model) -> DiagResult<Self::Model>;

    async fn read(&self, state: Self::Model) -> DiagResult<Self::Model>;

    async fn update(&self, plan: Self::Model, prior: Self::Model) -> DiagResult<Self::Model>;

    async fn delete(&self, state: Self::Model) -> DiagResult<()>;
}

/// A read-only data source type.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Send + Sync + 'static;

    fn type_suffix(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, config: Self::Model) -> DiagResult<Self::Model>;
}

/// Object-safe view of a [`Resource`].
#[async_trait]
pub trait DynResource: Send + Sync {
    fn type_suffix(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn config_validators(&self) -> Vec<ConfigValidator>;

    fn validate_config(&self, config: &Json) -> DiagResult<()>;

    async fn create(&self, plan: Json) -> DiagResult<Json>;

    async fn read(&self, state: Json) -> DiagResult<Json>;

    async fn update(&self, plan: Json, prior: Json) -> DiagResult<Json>;

    async fn delete(&self, state: Json) -> DiagResult<()>;
}

/// Object-safe view of a [`DataSource`].
#[async_trait]
pub trait DynDataSource: Send + Sync {
    fn type_suffix(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, config: Json) -> DiagResult<Json>;
}

/// Wraps a typed implementation so it can be stored as a trait object.
pub(crate) struct Erased<T>(pub(crate) T);

pub(crate) fn decode<M: DeserializeOwned>(value: Json) -> DiagResult<M> {
    serde_json::from_value(value).map_err(|e| {
        Diagnostic::error(
            "Value Conversion Error",
            format!("An unexpected error was encountered decoding an object: {e}"),
        )
        .into()
    })
}

pub(crate) fn encode<M: Serialize>(model: &M) -> DiagResult<Json> {
    serde_json::to_value(model).map_err(|e| {
        Diagnostic::error(
            "Value Conversion Error",
            format!("An unexpected error was encountered encoding an object: {e}"),
        )
        .into()
    })
}

#[async_trait]
impl<R: Resource> DynResource for Erased<R> {
    fn type_suffix(&self) -> &'static str {
        self.0.type_suffix()
    }

    fn schema(&self) -> Schema {
        self.0.schema()
    }

    fn config_validators(&self) -> Vec<ConfigValidator> {
        self.0.config_validators()
    }

    fn validate_config(&self, config: &Json) -> DiagResult<()> {
        let model: R::Model = decode(config.clone())?;
        self.0.validate_config(&model)
    }

    async fn create(&self, plan: Json) -> DiagResult<Json> {
        let model = self.0.create(decode(plan)?).await?;
        encode(&model)
    }

    async fn read(&self, state: Json) -> DiagResult<Json> {
        let model = self.0.read(decode(state)?).await?;
        encode(&model)
    }

    async fn update(&self, plan: Json, prior: Json) -> DiagResult<Json> {
        let model = self.0.update(decode(plan)?, decode(prior)?).await?;
        encode(&model)
    }

    async fn delete(&self, state: Json) -> DiagResult<()> {
        self.0.delete(decode(state)?).await
    }
}

#[async_trait]
impl<D: DataSource> DynDataSource for Erased<D> {
    fn type_suffix(&self) -> &'static str {
        self.0.type_suffix()
    }

    fn schema(&self) -> Schema {
        self.0.schema()
    }

    async fn read(&self, config: Json) -> DiagResult<Json> {
        let model = self.0.read(decode(config)?).await?;
        encode(&model)
    }
}

/// Diagnostic for an operation a resource type does not support.
pub fn unsupported_operation(type_name: &str, operation: &str) -> Diagnostics {
    Diagnostic::error(
        "Unsupported operation",
        format!("{type_name} does not support {operation}; changes require replacement"),
    )
    .into()
}
