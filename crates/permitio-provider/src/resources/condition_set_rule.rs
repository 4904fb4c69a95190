//! `permitio_condition_set_rule`: grants a user set a permission on a resource set.

use crate::common::{ComputedIds, client_error, id_attributes, operation_error, replacing_string};
use permitio_client::PermitClient;
use permitio_client::models::{SetRule, SetRuleRead};
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionSetRuleModel {
    #[serde(flatten)]
    pub ids: ComputedIds,
    pub user_set: Value<String>,
    pub permission: Value<String>,
    pub resource_set: Value<String>,
}

impl ConditionSetRuleModel {
    fn rule(&self) -> SetRule {
        SetRule {
            user_set: self.user_set.value_or_empty(),
            permission: self.permission.value_or_empty(),
            resource_set: self.resource_set.value_or_empty(),
        }
    }

    fn from_read(read: &SetRuleRead) -> Self {
        Self {
            ids: ComputedIds::from(&read.ids),
            user_set: Value::known(read.user_set.clone()),
            permission: Value::known(read.permission.clone()),
            resource_set: Value::known(read.resource_set.clone()),
        }
    }
}

/// Adapter for `permitio_condition_set_rule`.
pub struct ConditionSetRuleResource {
    client: Arc<PermitClient>,
}

impl ConditionSetRuleResource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ConditionSetRuleResource {
    type Model = ConditionSetRuleModel;

    fn type_suffix(&self) -> &'static str {
        "condition_set_rule"
    }

    fn schema(&self) -> Schema {
        let mut attrs = id_attributes();
        attrs.extend(attributes([
            ("user_set", replacing_string("Key of the user set receiving the permission.")),
            (
                "permission",
                replacing_string("The permission granted, in `resource:action` form."),
            ),
            (
                "resource_set",
                replacing_string("Key of the resource set the permission applies to."),
            ),
        ]));
        Schema::new(attrs).with_description("Grants a user set a permission on a resource set.")
    }

    #[instrument(skip(self, plan))]
    async fn create(&self, plan: ConditionSetRuleModel) -> DiagResult<ConditionSetRuleModel> {
        let rule = plan.rule();
        let created = self
            .client
            .assign_set_permission(&rule)
            .await
            .map_err(|e| client_error("create", "condition set rule", e))?;

        let Some(first) = created.first() else {
            return Err(operation_error(
                "create",
                "condition set rule",
                "the API returned no rules",
            ));
        };
        info!(
            user_set = %rule.user_set,
            permission = %rule.permission,
            resource_set = %rule.resource_set,
            "Permit condition set rule created"
        );
        Ok(ConditionSetRuleModel::from_read(first))
    }

    async fn read(&self, state: ConditionSetRuleModel) -> DiagResult<ConditionSetRuleModel> {
        let found = self
            .client
            .list_set_permissions(&state.rule())
            .await
            .map_err(|e| client_error("read", "condition set rule", e))?;

        match found.first() {
            Some(first) => Ok(ConditionSetRuleModel::from_read(first)),
            None => Err(operation_error(
                "read",
                "condition set rule",
                "condition set rule not found",
            )),
        }
    }

    async fn update(
        &self,
        _plan: ConditionSetRuleModel,
        _prior: ConditionSetRuleModel,
    ) -> DiagResult<ConditionSetRuleModel> {
        Err(unsupported_operation("permitio_condition_set_rule", "update"))
    }

    #[instrument(skip(self, state))]
    async fn delete(&self, state: ConditionSetRuleModel) -> DiagResult<()> {
        self.client
            .unassign_set_permission(&state.rule())
            .await
            .map_err(|e| client_error("delete", "condition set rule", e))
    }
}
