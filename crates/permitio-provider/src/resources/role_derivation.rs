//! `permitio_role_derivation`: holders of `role` on `on_resource` implicitly
//! receive `to_role` on `resource` through the `linked_by` relation.

use crate::common::{client_error, operation_error, replacing_string};
use permitio_client::PermitClient;
use permitio_client::models::DerivedRoleRule;
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleDerivationModel {
    pub resource: Value<String>,
    pub role: Value<String>,
    pub on_resource: Value<String>,
    pub to_role: Value<String>,
    pub linked_by: Value<String>,
}

impl RoleDerivationModel {
    fn rule(&self) -> DerivedRoleRule {
        DerivedRoleRule {
            role: self.role.value_or_empty(),
            on_resource: self.on_resource.value_or_empty(),
            linked_by_relation: self.linked_by.value_or_empty(),
        }
    }

    /// Identity fields come from the model, the rule fields from the API.
    fn with_rule(&self, rule: DerivedRoleRule) -> Self {
        Self {
            resource: self.resource.clone(),
            role: Value::known(rule.role),
            on_resource: Value::known(rule.on_resource),
            to_role: self.to_role.clone(),
            linked_by: Value::known(rule.linked_by_relation),
        }
    }
}

/// Adapter for `permitio_role_derivation`.
pub struct RoleDerivationResource {
    client: Arc<PermitClient>,
}

impl RoleDerivationResource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for RoleDerivationResource {
    type Model = RoleDerivationModel;

    fn type_suffix(&self) -> &'static str {
        "role_derivation"
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            ("resource", replacing_string("Key of the resource that owns the derived role.")),
            ("role", replacing_string("Key of the role that grants the derived role.")),
            ("on_resource", replacing_string("Key of the resource on which `role` is held.")),
            ("to_role", replacing_string("Key of the derived role.")),
            ("linked_by", replacing_string("Key of the relation linking the two resources.")),
        ]))
        .with_description("Derives a resource role from a role held on a related resource.")
    }

    #[instrument(skip(self, plan), fields(resource = ?plan.resource.as_str(), to_role = ?plan.to_role.as_str()))]
    async fn create(&self, plan: RoleDerivationModel) -> DiagResult<RoleDerivationModel> {
        let created = self
            .client
            .create_implicit_grant(
                &plan.resource.value_or_empty(),
                &plan.to_role.value_or_empty(),
                &plan.rule(),
            )
            .await
            .map_err(|e| client_error("create", "role derivation", e))?;
        info!(role = %created.role, on_resource = %created.on_resource, "Permit role derivation created");
        Ok(plan.with_rule(created))
    }

    async fn read(&self, state: RoleDerivationModel) -> DiagResult<RoleDerivationModel> {
        let resource = state.resource.value_or_empty();
        let to_role = state.to_role.value_or_empty();
        let target = self
            .client
            .get_resource_role(&resource, &to_role)
            .await
            .map_err(|e| client_error("read", "role derivation", e))?;

        let Some(granted_to) = target.granted_to else {
            return Err(operation_error("read", "role derivation", "target role has no role grants"));
        };

        let wanted = state.rule();
        debug!(
            candidates = granted_to.users_with_role.len(),
            "Searching {resource}/{to_role} for derivation"
        );
        match granted_to.users_with_role.into_iter().find(|rule| *rule == wanted) {
            Some(found) => Ok(state.with_rule(found)),
            None => Err(operation_error("read", "role derivation", "derivation not found")),
        }
    }

    async fn update(
        &self,
        _plan: RoleDerivationModel,
        _prior: RoleDerivationModel,
    ) -> DiagResult<RoleDerivationModel> {
        Err(unsupported_operation("permitio_role_derivation", "update"))
    }

    #[instrument(skip(self, state), fields(resource = ?state.resource.as_str(), to_role = ?state.to_role.as_str()))]
    async fn delete(&self, state: RoleDerivationModel) -> DiagResult<()> {
        self.client
            .delete_implicit_grant(
                &state.resource.value_or_empty(),
                &state.to_role.value_or_empty(),
                &state.rule(),
            )
            .await
            .map_err(|e| client_error("delete", "role derivation", e))
    }
}
