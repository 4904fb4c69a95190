//! `permitio_user_set` and `permitio_resource_set`.
//!
//! Both are condition sets; one adapter serves both, tagged with the set type.
//! `conditions` is held in state as a JSON string.

use crate::common::{
    ComputedIds, client_error, encode_json_object, id_attributes, key_attribute, key_or_id,
    known_string, non_empty, parse_json_object,
};
use permitio_client::PermitClient;
use permitio_client::models::{ConditionSetCreate, ConditionSetRead, ConditionSetType, ConditionSetUpdate};
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionSetModel {
    #[serde(flatten)]
    pub ids: ComputedIds,
    pub key: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub conditions: Value<String>,
    pub parent_id: Value<String>,
    /// Resource key; resource sets only.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub resource: Value<String>,
}

impl ConditionSetModel {
    /// State from an API response, keeping `configured` conditions when the
    /// server echoed the same object.
    pub fn from_read(read: ConditionSetRead, configured: Option<&str>) -> DiagResult<Self> {
        let conditions = encode_json_object("conditions", configured, &read.conditions)?;
        Ok(Self {
            ids: ComputedIds::from(&read.ids),
            key: Value::known(read.key),
            name: Value::known(read.name),
            description: non_empty(read.description),
            conditions: Value::known(conditions),
            parent_id: read.parent_id.into(),
            resource: read.resource.map(|r| r.key).into(),
        })
    }

    /// Like [`Self::from_read`], falling back to `prior` for the resource key
    /// when the response does not embed the resource.
    fn refreshed(read: ConditionSetRead, prior: &ConditionSetModel) -> DiagResult<Self> {
        let mut model = Self::from_read(read, prior.conditions.as_str())?;
        model.resource = model.resource.or(prior.resource.clone());
        Ok(model)
    }
}

/// Adapter for condition sets of one [`ConditionSetType`].
pub struct ConditionSetResource {
    client: Arc<PermitClient>,
    set_type: ConditionSetType,
}

impl ConditionSetResource {
    pub fn user_set(client: Arc<PermitClient>) -> Self {
        Self {
            client,
            set_type: ConditionSetType::UserSet,
        }
    }

    pub fn resource_set(client: Arc<PermitClient>) -> Self {
        Self {
            client,
            set_type: ConditionSetType::ResourceSet,
        }
    }

    fn conditions(&self, plan: &ConditionSetModel, action: &str) -> DiagResult<Map<String, Json>> {
        parse_json_object(plan.conditions.as_str().unwrap_or("{}")).map_err(|e| {
            Diagnostic::error(
                format!("Unable to {action} condition set"),
                format!("unable to {action} condition set: invalid conditions: {e}"),
            )
            .with_attribute(AttributePath::root("conditions"))
            .into()
        })
    }
}

#[async_trait]
impl Resource for ConditionSetResource {
    type Model = ConditionSetModel;

    fn type_suffix(&self) -> &'static str {
        match self.set_type {
            ConditionSetType::UserSet => "user_set",
            ConditionSetType::ResourceSet => "resource_set",
        }
    }

    fn schema(&self) -> Schema {
        let mut attrs = id_attributes();
        attrs.extend(attributes([
            ("key", key_attribute()),
            (
                "name",
                Attribute::string()
                    .required()
                    .with_description("A descriptive name for the set, i.e: 'US based employees' or 'Users behind VPN'"),
            ),
            (
                "description",
                Attribute::string()
                    .optional()
                    .computed()
                    .with_description("An optional longer description of the set.")
                    .with_plan_modifier(PlanModifier::UseStateForUnknown)
                    .with_plan_modifier(PlanModifier::NormalizeEmptyStringToNull),
            ),
            (
                "conditions",
                Attribute::string()
                    .required()
                    .with_description("A boolean expression that consists of multiple conditions, with and/or logic, encoded as JSON."),
            ),
            (
                "parent_id",
                Attribute::string()
                    .optional()
                    .computed()
                    .with_description("The parent condition set id. Allows creating a nested condition set hierarchy.")
                    .with_plan_modifier(PlanModifier::UseStateForUnknown),
            ),
        ]));

        let schema = Schema::new(attrs);
        match self.set_type {
            ConditionSetType::UserSet => schema.with_description("A set of users matched by attribute conditions."),
            ConditionSetType::ResourceSet => schema
                .with_description("A set of resource instances matched by attribute conditions.")
                .with_attribute(
                    "resource",
                    Attribute::string()
                        .required()
                        .with_description("Key of the resource the set filters.")
                        .with_plan_modifier(PlanModifier::RequiresReplace),
                ),
        }
    }

    fn validate_config(&self, config: &ConditionSetModel) -> DiagResult<()> {
        let Some(raw) = config.conditions.as_str() else {
            return Ok(());
        };
        parse_json_object(raw).map(|_| ()).map_err(|e| {
            Diagnostic::error("Invalid conditions", format!("conditions must be a JSON object: {e}"))
                .with_attribute(AttributePath::root("conditions"))
                .into()
        })
    }

    #[instrument(skip(self, plan), fields(set_type = %self.set_type, key = ?plan.key.as_str()))]
    async fn create(&self, plan: ConditionSetModel) -> DiagResult<ConditionSetModel> {
        let body = ConditionSetCreate {
            key: plan.key.value_or_empty(),
            name: plan.name.value_or_empty(),
            description: known_string(&plan.description),
            set_type: self.set_type,
            resource_id: match self.set_type {
                ConditionSetType::ResourceSet => known_string(&plan.resource),
                ConditionSetType::UserSet => None,
            },
            conditions: self.conditions(&plan, "create")?,
            parent_id: known_string(&plan.parent_id),
        };

        let read = self
            .client
            .create_condition_set(&body)
            .await
            .map_err(|e| client_error("create", "condition set", e))?;
        info!(key = %read.key, set_type = %read.set_type, "Permit condition set created");
        ConditionSetModel::refreshed(read, &plan)
    }

    async fn read(&self, state: ConditionSetModel) -> DiagResult<ConditionSetModel> {
        let read = self
            .client
            .get_condition_set(&key_or_id(&state.key, &state.ids.id))
            .await
            .map_err(|e| client_error("read", "condition set", e))?;
        ConditionSetModel::refreshed(read, &state)
    }

    #[instrument(skip(self, plan, _prior), fields(set_type = %self.set_type, key = ?plan.key.as_str()))]
    async fn update(&self, plan: ConditionSetModel, _prior: ConditionSetModel) -> DiagResult<ConditionSetModel> {
        let body = ConditionSetUpdate {
            name: known_string(&plan.name),
            description: known_string(&plan.description),
            conditions: Some(self.conditions(&plan, "update")?),
            parent_id: known_string(&plan.parent_id),
        };

        let read = self
            .client
            .update_condition_set(&plan.key.value_or_empty(), &body)
            .await
            .map_err(|e| client_error("update", "condition set", e))?;
        info!(key = %read.key, "Permit condition set updated");
        ConditionSetModel::refreshed(read, &plan)
    }

    async fn delete(&self, state: ConditionSetModel) -> DiagResult<()> {
        self.client
            .delete_condition_set(&state.key.value_or_empty())
            .await
            .map_err(|e| client_error("delete", "condition set", e))
    }
}
