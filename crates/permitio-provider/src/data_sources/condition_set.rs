//! `permitio_condition_set` data source: user sets and resource sets alike.

use crate::common::{ComputedIds, client_error, encode_json_object, id_attributes, non_empty};
use permitio_client::PermitClient;
use permitio_client::models::ConditionSetRead;
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionSetDataModel {
    #[serde(flatten)]
    pub ids: ComputedIds,
    pub key: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    /// `userset` or `resourceset`.
    #[serde(rename = "type")]
    pub set_type: Value<String>,
    pub resource: Value<String>,
    pub conditions: Value<String>,
    pub parent_id: Value<String>,
}

impl ConditionSetDataModel {
    fn from_read(read: ConditionSetRead) -> DiagResult<Self> {
        Ok(Self {
            ids: ComputedIds::from(&read.ids),
            conditions: Value::known(encode_json_object("conditions", None, &read.conditions)?),
            key: Value::known(read.key),
            name: Value::known(read.name),
            description: non_empty(read.description),
            set_type: Value::known(read.set_type.to_string()),
            resource: read.resource.map(|r| r.key).into(),
            parent_id: read.parent_id.into(),
        })
    }
}

/// Looks up a condition set by key.
pub struct ConditionSetDataSource {
    client: Arc<PermitClient>,
}

impl ConditionSetDataSource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ConditionSetDataSource {
    type Model = ConditionSetDataModel;

    fn type_suffix(&self) -> &'static str {
        "condition_set"
    }

    fn schema(&self) -> Schema {
        let computed = |description: &str| Attribute::string().computed().with_description(description);
        let mut attrs = id_attributes();
        for attribute in attrs.values_mut() {
            attribute.plan_modifiers.clear();
        }
        attrs.extend(attributes([
            (
                "key",
                Attribute::string()
                    .required()
                    .with_description("Key of the condition set to look up."),
            ),
            ("name", computed("A descriptive name for the set.")),
            ("description", computed("An optional longer description of the set.")),
            ("type", computed("Either `userset` or `resourceset`.")),
            ("resource", computed("Key of the resource a resource set filters.")),
            ("conditions", computed("The set's conditions, encoded as JSON.")),
            ("parent_id", computed("The parent condition set id.")),
        ]));
        Schema::new(attrs).with_description("Looks up a user set or resource set by key.")
    }

    #[instrument(skip(self, config), fields(key = ?config.key.as_str()))]
    async fn read(&self, config: ConditionSetDataModel) -> DiagResult<ConditionSetDataModel> {
        let read = self
            .client
            .get_condition_set(&config.key.value_or_empty())
            .await
            .map_err(|e| client_error("read", "condition set", e))?;
        ConditionSetDataModel::from_read(read)
    }
}
