//! `permitio_resource`: a resource type with its actions and attributes.

use crate::common::{
    AttributeTypeValidator, ComputedIds, Timestamps, base_attributes, client_error, key_or_id,
    known_string,
};
use permitio_client::PermitClient;
use permitio_client::models::{
    ActionBlock, AttributeBlock, ResourceCreate, ResourceRead, ResourceUpdate,
};
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionModel {
    pub id: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeModel {
    #[serde(rename = "type")]
    pub attribute_type: Value<String>,
    pub description: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceModel {
    #[serde(flatten)]
    pub ids: ComputedIds,
    #[serde(flatten)]
    pub timestamps: Timestamps,
    pub key: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub urn: Value<String>,
    pub actions: Value<BTreeMap<String, ActionModel>>,
    pub attributes: Value<BTreeMap<String, AttributeModel>>,
}

impl ResourceModel {
    fn action_blocks(&self) -> BTreeMap<String, ActionBlock> {
        self.actions
            .as_known()
            .map(|actions| {
                actions
                    .iter()
                    .map(|(key, action)| {
                        (
                            key.clone(),
                            ActionBlock {
                                name: known_string(&action.name),
                                description: known_string(&action.description),
                            },
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn attribute_blocks(&self) -> Option<BTreeMap<String, AttributeBlock>> {
        self.attributes.as_known().map(|attrs| {
            attrs
                .iter()
                .map(|(key, attr)| {
                    (
                        key.clone(),
                        AttributeBlock {
                            attribute_type: attr.attribute_type.value_or_empty(),
                            description: known_string(&attr.description),
                        },
                    )
                })
                .collect()
        })
    }

    /// State from an API response. Actions without a name fall back to their key.
    pub fn from_read(read: ResourceRead) -> Self {
        let actions = read
            .actions
            .into_iter()
            .map(|(key, action)| {
                let name = action.name.unwrap_or_else(|| key.clone());
                (
                    key,
                    ActionModel {
                        id: Value::known(action.id),
                        name: Value::known(name),
                        description: action.description.into(),
                    },
                )
            })
            .collect();

        let attributes = if read.attributes.is_empty() {
            Value::Null
        } else {
            Value::known(
                read.attributes
                    .into_iter()
                    .map(|(key, attr)| {
                        (
                            key,
                            AttributeModel {
                                attribute_type: Value::known(attr.attribute_type),
                                description: attr.description.into(),
                            },
                        )
                    })
                    .collect(),
            )
        };

        Self {
            ids: ComputedIds::from(&read.ids),
            timestamps: Timestamps::new(&read.created_at, &read.updated_at),
            key: Value::known(read.key),
            name: Value::known(read.name),
            description: read.description.into(),
            urn: read.urn.into(),
            actions: Value::known(actions),
            attributes,
        }
    }
}

fn action_attributes() -> BTreeMap<String, Attribute> {
    attributes([
        (
            "id",
            Attribute::string()
                .computed()
                .with_plan_modifier(PlanModifier::UseStateForUnknown),
        ),
        ("name", Attribute::string().required()),
        ("description", Attribute::string().optional()),
    ])
}

fn attribute_attributes() -> BTreeMap<String, Attribute> {
    attributes([
        (
            "type",
            Attribute::string()
                .required()
                .with_description(
                    "The type of the attribute: bool, number, string, time, array, json, object or object_array.",
                )
                .with_validator(AttributeTypeValidator),
        ),
        ("description", Attribute::string().optional()),
    ])
}

/// Adapter for `permitio_resource`.
pub struct ResourceResource {
    client: Arc<PermitClient>,
}

impl ResourceResource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ResourceResource {
    type Model = ResourceModel;

    fn type_suffix(&self) -> &'static str {
        "resource"
    }

    fn schema(&self) -> Schema {
        let mut attrs = base_attributes();
        attrs.extend(attributes([
            (
                "urn",
                Attribute::string()
                    .optional()
                    .computed()
                    .with_description("The URN (Uniform Resource Name) of the resource.")
                    .with_plan_modifier(PlanModifier::UseStateForUnknown),
            ),
            (
                "actions",
                Attribute::map_nested(action_attributes())
                    .required()
                    .with_description("The actions that can be performed on the resource, keyed by action key."),
            ),
            (
                "attributes",
                Attribute::map_nested(attribute_attributes())
                    .optional()
                    .with_description("The attributes of the resource, keyed by attribute key."),
            ),
        ]));
        Schema::new(attrs).with_description("A resource type and the actions that can be performed on it.")
    }

    #[instrument(skip(self, plan), fields(key = ?plan.key.as_str()))]
    async fn create(&self, plan: ResourceModel) -> DiagResult<ResourceModel> {
        let body = ResourceCreate {
            key: plan.key.value_or_empty(),
            name: plan.name.value_or_empty(),
            urn: known_string(&plan.urn),
            description: known_string(&plan.description),
            actions: plan.action_blocks(),
            attributes: plan.attribute_blocks(),
        };

        let read = self
            .client
            .create_resource(&body)
            .await
            .map_err(|e| client_error("create", "resource", e))?;
        info!(key = %read.key, actions = read.actions.len(), "Permit resource created");
        Ok(ResourceModel::from_read(read))
    }

    async fn read(&self, state: ResourceModel) -> DiagResult<ResourceModel> {
        let read = self
            .client
            .get_resource(&key_or_id(&state.key, &state.ids.id))
            .await
            .map_err(|e| client_error("read", "resource", e))?;
        Ok(ResourceModel::from_read(read))
    }

    #[instrument(skip(self, plan, prior), fields(key = ?plan.key.as_str()))]
    async fn update(&self, plan: ResourceModel, prior: ResourceModel) -> DiagResult<ResourceModel> {
        let body = ResourceUpdate {
            name: known_string(&plan.name),
            urn: known_string(&prior.urn),
            description: known_string(&plan.description),
            actions: Some(plan.action_blocks()),
            attributes: Some(plan.attribute_blocks().unwrap_or_default()),
        };

        let read = self
            .client
            .update_resource(&plan.key.value_or_empty(), &body)
            .await
            .map_err(|e| client_error("update", "resource", e))?;
        info!(key = %read.key, actions = read.actions.len(), "Permit resource updated");
        Ok(ResourceModel::from_read(read))
    }

    async fn delete(&self, state: ResourceModel) -> DiagResult<()> {
        self.client
            .delete_resource(&state.key.value_or_empty())
            .await
            .map_err(|e| client_error("delete", "resource", e))
    }
}
