//! `permitio_role` data source.

use super::lookup_schema;
use crate::common::client_error;
use crate::resources::{RoleModel, RoleResource};
use permitio_client::PermitClient;
use permitio_framework::prelude::*;
use std::sync::Arc;
use tracing::instrument;

/// Looks up a global role, or a resource role when `resource` is set.
pub struct RoleDataSource {
    client: Arc<PermitClient>,
}

impl RoleDataSource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for RoleDataSource {
    type Model = RoleModel;

    fn type_suffix(&self) -> &'static str {
        "role"
    }

    fn schema(&self) -> Schema {
        lookup_schema(RoleResource::new(self.client.clone()).schema(), &["key"], &["resource"])
            .with_description("Looks up a role and its permissions by key.")
    }

    #[instrument(skip(self, config), fields(key = ?config.key.as_str(), resource = ?config.resource.as_str()))]
    async fn read(&self, config: RoleModel) -> DiagResult<RoleModel> {
        let read = config
            .scope()
            .get(&self.client, &config.key.value_or_empty())
            .await
            .map_err(|e| client_error("read", "role", e))?;
        Ok(RoleModel::from_read(read))
    }
}
