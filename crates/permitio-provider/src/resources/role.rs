//! `permitio_role`: global roles and roles scoped to a resource.

use crate::common::{
    ComputedIds, Timestamps, base_attributes, client_error, key_or_id, known_string,
    string_elements,
};
use permitio_client::models::{RoleCreate, RoleRead, RoleUpdate};
use permitio_client::{PermitClient, PermitResult};
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleModel {
    #[serde(flatten)]
    pub ids: ComputedIds,
    #[serde(flatten)]
    pub timestamps: Timestamps,
    pub key: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub permissions: Value<Vec<String>>,
    pub extends: Value<Vec<String>>,
    pub resource: Value<String>,
    pub resource_id: Value<String>,
}

impl RoleModel {
    pub fn from_read(read: RoleRead) -> Self {
        Self {
            ids: ComputedIds::from(&read.ids),
            timestamps: Timestamps::new(&read.created_at, &read.updated_at),
            key: Value::known(read.key),
            name: Value::known(read.name),
            description: read.description.into(),
            permissions: Value::known(read.permissions),
            extends: Value::known(read.extends),
            resource: read.resource.into(),
            resource_id: read.resource_id.into(),
        }
    }

    pub fn scope(&self) -> RoleScope {
        match self.resource.as_known() {
            Some(resource) => RoleScope::Resource {
                resource: resource.clone(),
            },
            None => RoleScope::Global,
        }
    }
}

/// Where a role lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleScope {
    /// `/roles`
    Global,
    /// `/resources/{resource}/roles`
    Resource { resource: String },
}

impl RoleScope {
    pub(crate) async fn create(&self, client: &PermitClient, body: &RoleCreate) -> PermitResult<RoleRead> {
        match self {
            Self::Global => client.create_role(body).await,
            Self::Resource { resource } => client.create_resource_role(resource, body).await,
        }
    }

    pub(crate) async fn get(&self, client: &PermitClient, key_or_id: &str) -> PermitResult<RoleRead> {
        match self {
            Self::Global => client.get_role(key_or_id).await,
            Self::Resource { resource } => client.get_resource_role(resource, key_or_id).await,
        }
    }

    async fn update(&self, client: &PermitClient, key: &str, body: &RoleUpdate) -> PermitResult<RoleRead> {
        match self {
            Self::Global => client.update_role(key, body).await,
            Self::Resource { resource } => client.update_resource_role(resource, key, body).await,
        }
    }

    async fn delete(&self, client: &PermitClient, key: &str) -> PermitResult<()> {
        match self {
            Self::Global => client.delete_role(key).await,
            Self::Resource { resource } => client.delete_resource_role(resource, key).await,
        }
    }
}

/// Adapter for `permitio_role`.
pub struct RoleResource {
    client: Arc<PermitClient>,
}

impl RoleResource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for RoleResource {
    type Model = RoleModel;

    fn type_suffix(&self) -> &'static str {
        "role"
    }

    fn schema(&self) -> Schema {
        let mut attrs = base_attributes();
        attrs.extend(attributes([
            (
                "permissions",
                Attribute::set(ElementType::String)
                    .optional()
                    .computed()
                    .with_description("Permissions granted by the role, in `resource:action` form.")
                    .with_plan_modifier(PlanModifier::UseStateForUnknown),
            ),
            (
                "extends",
                Attribute::set(ElementType::String)
                    .optional()
                    .computed()
                    .with_description("Keys of roles whose permissions this role inherits.")
                    .with_plan_modifier(PlanModifier::UseStateForUnknown),
            ),
            (
                "resource",
                Attribute::string()
                    .optional()
                    .with_description("Key of the resource the role is scoped to. Global when unset.")
                    .with_plan_modifier(PlanModifier::RequiresReplace),
            ),
            (
                "resource_id",
                Attribute::string()
                    .computed()
                    .with_description("ID of the resource the role is scoped to."),
            ),
        ]));
        Schema::new(attrs).with_description("A role, either global or scoped to a resource.")
    }

    #[instrument(skip(self, plan), fields(key = ?plan.key.as_str(), resource = ?plan.resource.as_str()))]
    async fn create(&self, plan: RoleModel) -> DiagResult<RoleModel> {
        let body = RoleCreate {
            key: plan.key.value_or_empty(),
            name: plan.name.value_or_empty(),
            description: known_string(&plan.description),
            permissions: string_elements(&plan.permissions),
            extends: string_elements(&plan.extends),
        };

        let read = plan
            .scope()
            .create(&self.client, &body)
            .await
            .map_err(|e| client_error("create", "role", e))?;
        info!(key = %read.key, permissions = read.permissions.len(), "Permit role created");
        Ok(RoleModel::from_read(read))
    }

    async fn read(&self, state: RoleModel) -> DiagResult<RoleModel> {
        let read = state
            .scope()
            .get(&self.client, &key_or_id(&state.key, &state.ids.id))
            .await
            .map_err(|e| client_error("read", "role", e))?;
        Ok(RoleModel::from_read(read))
    }

    #[instrument(skip(self, plan, _prior), fields(key = ?plan.key.as_str()))]
    async fn update(&self, plan: RoleModel, _prior: RoleModel) -> DiagResult<RoleModel> {
        let body = RoleUpdate {
            name: known_string(&plan.name),
            description: known_string(&plan.description),
            permissions: Some(string_elements(&plan.permissions)),
            extends: Some(string_elements(&plan.extends)),
        };

        let read = plan
            .scope()
            .update(&self.client, &plan.key.value_or_empty(), &body)
            .await
            .map_err(|e| client_error("update", "role", e))?;
        info!(key = %read.key, "Permit role updated");
        Ok(RoleModel::from_read(read))
    }

    async fn delete(&self, state: RoleModel) -> DiagResult<()> {
        state
            .scope()
            .delete(&self.client, &state.key.value_or_empty())
            .await
            .map_err(|e| client_error("delete", "role", e))
    }
}
