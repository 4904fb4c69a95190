//! Named collection of the resource and data source types a provider serves.

use crate::resource::{DataSource, DynDataSource, DynResource, Erased, Resource};
use crate::schema::Schema;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Resource and data source implementations, keyed by full type name
/// (`{provider}_{suffix}`).
#[derive(Clone)]
pub struct Registry {
    provider_type: String,
    resources: BTreeMap<String, Arc<dyn DynResource>>,
    data_sources: BTreeMap<String, Arc<dyn DynDataSource>>,
}

/// Every schema a provider exposes.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resource_schemas: BTreeMap<String, Schema>,
    pub data_source_schemas: BTreeMap<String, Schema>,
}

impl Registry {
    pub fn new(provider_type: impl Into<String>) -> Self {
        Self {
            provider_type: provider_type.into(),
            resources: BTreeMap::new(),
            data_sources: BTreeMap::new(),
        }
    }

    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }

    fn type_name(&self, suffix: &str) -> String {
        format!("{}_{}", self.provider_type, suffix)
    }

    /// Register a resource type. A later registration with the same name
    /// replaces the earlier one.
    pub fn register_resource<R: Resource + 'static>(&mut self, resource: R) -> &mut Self {
        let name = self.type_name(resource.type_suffix());
        self.resources.insert(name, Arc::new(Erased(resource)));
        self
    }

    pub fn register_data_source<D: DataSource + 'static>(&mut self, data_source: D) -> &mut Self {
        let name = self.type_name(data_source.type_suffix());
        self.data_sources.insert(name, Arc::new(Erased(data_source)));
        self
    }

    pub fn resource(&self, type_name: &str) -> Option<Arc<dyn DynResource>> {
        self.resources.get(type_name).cloned()
    }

    pub fn data_source(&self, type_name: &str) -> Option<Arc<dyn DynDataSource>> {
        self.data_sources.get(type_name).cloned()
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    pub fn schemas(&self, provider: Schema) -> ProviderSchema {
        ProviderSchema {
            provider,
            resource_schemas: self
                .resources
                .iter()
                .map(|(name, r)| (name.clone(), r.schema()))
                .collect(),
            data_source_schemas: self
                .data_sources
                .iter()
                .map(|(name, d)| (name.clone(), d.schema()))
                .collect(),
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("provider_type", &self.provider_type)
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("data_sources", &self.data_sources.keys().collect::<Vec<_>>())
            .finish()
    }
}
