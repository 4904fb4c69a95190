//! `permitio_resource` data source.

use super::lookup_schema;
use crate::common::client_error;
use crate::resources::{ResourceModel, ResourceResource};
use permitio_client::PermitClient;
use permitio_framework::prelude::*;
use std::sync::Arc;
use tracing::instrument;

/// Looks up a resource by key.
pub struct ResourceDataSource {
    client: Arc<PermitClient>,
}

impl ResourceDataSource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ResourceDataSource {
    type Model = ResourceModel;

    fn type_suffix(&self) -> &'static str {
        "resource"
    }

    fn schema(&self) -> Schema {
        lookup_schema(ResourceResource::new(self.client.clone()).schema(), &["key"], &[])
            .with_description("Looks up a resource type and its actions and attributes by key.")
    }

    #[instrument(skip(self, config), fields(key = ?config.key.as_str()))]
    async fn read(&self, config: ResourceModel) -> DiagResult<ResourceModel> {
        let read = self
            .client
            .get_resource(&config.key.value_or_empty())
            .await
            .map_err(|e| client_error("read", "resource", e))?;
        Ok(ResourceModel::from_read(read))
    }
}
