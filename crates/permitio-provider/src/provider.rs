//! The `permitio` provider: configuration and registration of every type.

use crate::config::{ProviderModel, provider_schema, resolve_config};
use crate::data_sources::{ConditionSetDataSource, ResourceDataSource, RoleDataSource};
use crate::resources::{
    ConditionSetResource, ConditionSetRuleResource, ProxyConfigResource, RelationResource,
    ResourceResource, RoleDerivationResource, RoleResource, TenantResource, UserAttributeResource,
};
use permitio_client::{PermitClient, PermitConfig};
use permitio_framework::prelude::*;
use permitio_framework::{ProviderSchema, Registry, validate_config};
use serde_json::Value as Json;
use std::env::VarError;
use std::sync::Arc;
use tracing::{info, instrument};

/// Provider type name; every resource type is prefixed with it.
pub const TYPE_NAME: &str = "permitio";

pub struct PermitProvider;

impl PermitProvider {
    pub fn schema() -> Schema {
        provider_schema()
    }

    /// Validate the provider block, resolve settings and build the registry.
    #[instrument(skip_all)]
    pub fn configure<F>(config: &Json, reader: F) -> DiagResult<Registry>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        info!("Configuring Permit.io client");
        validate_config(&Self::schema(), config).into_result(())?;
        let model: ProviderModel = serde_json::from_value(config.clone()).map_err(|e| {
            Diagnostics::from(Diagnostic::error(
                "Value Conversion Error",
                format!("An unexpected error was encountered decoding the provider block: {e}"),
            ))
        })?;

        let settings = resolve_config(&model, reader)?;
        let client = PermitClient::new(settings).map_err(|e| {
            Diagnostics::from(Diagnostic::error(
                "Unable to create Permit.io client",
                format!("unable to create Permit.io client: {e}"),
            ))
        })?;
        Ok(Self::registry(Arc::new(client)))
    }

    /// Register every resource and data source against `client`.
    pub fn registry(client: Arc<PermitClient>) -> Registry {
        let mut registry = Registry::new(TYPE_NAME);
        registry
            .register_resource(ResourceResource::new(client.clone()))
            .register_resource(RoleResource::new(client.clone()))
            .register_resource(ConditionSetResource::user_set(client.clone()))
            .register_resource(ConditionSetResource::resource_set(client.clone()))
            .register_resource(ConditionSetRuleResource::new(client.clone()))
            .register_resource(ProxyConfigResource::new(client.clone()))
            .register_resource(RelationResource::new(client.clone()))
            .register_resource(RoleDerivationResource::new(client.clone()))
            .register_resource(TenantResource::new(client.clone()))
            .register_resource(UserAttributeResource::new(client.clone()))
            .register_data_source(ResourceDataSource::new(client.clone()))
            .register_data_source(RoleDataSource::new(client.clone()))
            .register_data_source(ConditionSetDataSource::new(client));
        registry
    }

    /// Provider, resource and data source schemas.
    pub fn schemas(registry: &Registry) -> ProviderSchema {
        registry.schemas(Self::schema())
    }

    /// Schemas without a configured provider block. No request is made.
    pub fn describe() -> DiagResult<ProviderSchema> {
        let client = PermitClient::new(PermitConfig::new(SCHEMA_ONLY_KEY)).map_err(|e| {
            Diagnostics::from(Diagnostic::error(
                "Unable to create Permit.io client",
                format!("unable to create Permit.io client: {e}"),
            ))
        })?;
        Ok(Self::schemas(&Self::registry(Arc::new(client))))
    }
}

const SCHEMA_ONLY_KEY: &str = "schema-only";
