//! `permitio_user_attribute`: an attribute on the built-in user resource.

use crate::common::{
    AttributeTypeValidator, ComputedIds, Timestamps, base_attributes, client_error, key_or_id,
    known_string,
};
use permitio_client::PermitClient;
use permitio_client::models::{ResourceAttributeCreate, ResourceAttributeRead, ResourceAttributeUpdate};
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Key of the built-in resource that carries user attributes.
pub const USER_RESOURCE_KEY: &str = "__user";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAttributeModel {
    #[serde(flatten)]
    pub ids: ComputedIds,
    #[serde(flatten)]
    pub timestamps: Timestamps,
    pub key: Value<String>,
    pub description: Value<String>,
    #[serde(rename = "type")]
    pub attribute_type: Value<String>,
    pub resource_id: Value<String>,
    pub resource_key: Value<String>,
}

impl From<ResourceAttributeRead> for UserAttributeModel {
    fn from(read: ResourceAttributeRead) -> Self {
        Self {
            ids: ComputedIds::from(&read.ids),
            timestamps: Timestamps::new(&read.created_at, &read.updated_at),
            key: Value::known(read.key),
            description: read.description.into(),
            attribute_type: Value::known(read.attribute_type),
            resource_id: Value::known(read.resource_id),
            resource_key: Value::known(USER_RESOURCE_KEY.to_string()),
        }
    }
}

/// Adapter for `permitio_user_attribute`.
pub struct UserAttributeResource {
    client: Arc<PermitClient>,
}

impl UserAttributeResource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for UserAttributeResource {
    type Model = UserAttributeModel;

    fn type_suffix(&self) -> &'static str {
        "user_attribute"
    }

    fn schema(&self) -> Schema {
        let mut attrs = base_attributes();
        attrs.remove("name");
        attrs.extend(attributes([
            (
                "description",
                Attribute::string()
                    .required()
                    .with_description("What the attribute holds."),
            ),
            (
                "type",
                Attribute::string()
                    .required()
                    .with_description(
                        "The type of the attribute: bool, number, string, time, array, json, object or object_array.",
                    )
                    .with_validator(AttributeTypeValidator),
            ),
            (
                "resource_id",
                Attribute::string()
                    .computed()
                    .with_description("ID of the built-in user resource.")
                    .with_plan_modifier(PlanModifier::UseStateForUnknown),
            ),
            (
                "resource_key",
                Attribute::string()
                    .computed()
                    .with_description("Key of the built-in user resource; always `__user`.")
                    .with_plan_modifier(PlanModifier::UseStateForUnknown),
            ),
        ]));
        Schema::new(attrs).with_description("An attribute that can be set on users and used in user sets.")
    }

    #[instrument(skip(self, plan), fields(key = ?plan.key.as_str()))]
    async fn create(&self, plan: UserAttributeModel) -> DiagResult<UserAttributeModel> {
        let body = ResourceAttributeCreate {
            key: plan.key.value_or_empty(),
            attribute_type: plan.attribute_type.value_or_empty(),
            description: known_string(&plan.description),
        };

        let read = self
            .client
            .create_resource_attribute(USER_RESOURCE_KEY, &body)
            .await
            .map_err(|e| client_error("create", "user attribute", e))?;
        info!(key = %read.key, attribute_type = %read.attribute_type, "Permit user attribute created");
        Ok(read.into())
    }

    async fn read(&self, state: UserAttributeModel) -> DiagResult<UserAttributeModel> {
        let read = self
            .client
            .get_resource_attribute(USER_RESOURCE_KEY, &key_or_id(&state.key, &state.ids.id))
            .await
            .map_err(|e| client_error("read", "user attribute", e))?;
        Ok(read.into())
    }

    #[instrument(skip(self, plan, _prior), fields(key = ?plan.key.as_str()))]
    async fn update(&self, plan: UserAttributeModel, _prior: UserAttributeModel) -> DiagResult<UserAttributeModel> {
        let body = ResourceAttributeUpdate {
            attribute_type: known_string(&plan.attribute_type),
            description: known_string(&plan.description),
        };

        let read = self
            .client
            .update_resource_attribute(USER_RESOURCE_KEY, &plan.key.value_or_empty(), &body)
            .await
            .map_err(|e| client_error("update", "user attribute", e))?;
        info!(key = %read.key, "Permit user attribute updated");
        Ok(read.into())
    }

    async fn delete(&self, state: UserAttributeModel) -> DiagResult<()> {
        self.client
            .delete_resource_attribute(USER_RESOURCE_KEY, &state.key.value_or_empty())
            .await
            .map_err(|e| client_error("delete", "user attribute", e))
    }
}
