//! `permitio_relation`: a named relation between two resources.

use crate::common::{ComputedIds, base_attributes, client_error, known_string, replacing_string};
use permitio_client::PermitClient;
use permitio_client::models::{RelationCreate, RelationRead};
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationModel {
    #[serde(flatten)]
    pub ids: ComputedIds,
    pub key: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    pub subject_resource: Value<String>,
    pub subject_resource_id: Value<String>,
    pub object_resource: Value<String>,
    pub object_resource_id: Value<String>,
}

impl From<RelationRead> for RelationModel {
    fn from(read: RelationRead) -> Self {
        Self {
            ids: ComputedIds::from(&read.ids),
            key: Value::known(read.key),
            name: Value::known(read.name),
            description: read.description.into(),
            subject_resource: Value::known(read.subject_resource),
            subject_resource_id: Value::known(read.subject_resource_id),
            object_resource: Value::known(read.object_resource),
            object_resource_id: Value::known(read.object_resource_id),
        }
    }
}

/// Adapter for `permitio_relation`.
pub struct RelationResource {
    client: Arc<PermitClient>,
}

impl RelationResource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for RelationResource {
    type Model = RelationModel;

    fn type_suffix(&self) -> &'static str {
        "relation"
    }

    fn schema(&self) -> Schema {
        let mut attrs = base_attributes();
        attrs.remove("created_at");
        attrs.remove("updated_at");
        attrs.extend(attributes([
            (
                "name",
                Attribute::string().required().with_description(
                    "The name of the relation. Relations cannot be updated; \
                     changing the name fails with an unsupported operation error.",
                ),
            ),
            (
                "description",
                Attribute::string().optional().computed().with_description(
                    "The description of the relation. Relations cannot be updated; \
                     changing the description fails with an unsupported operation error.",
                ),
            ),
            (
                "subject_resource",
                replacing_string("The subject resource key of the relation, e.g. `folder` in \"folder is parent of document\"."),
            ),
            (
                "object_resource",
                replacing_string("The object resource key of the relation, e.g. `document` in \"folder is parent of document\"."),
            ),
            (
                "subject_resource_id",
                Attribute::string()
                    .computed()
                    .with_description("The subject resource ID."),
            ),
            (
                "object_resource_id",
                Attribute::string()
                    .computed()
                    .with_description("The object resource ID."),
            ),
        ]));
        Schema::new(attrs).with_description("A relation between a subject resource and an object resource.")
    }

    #[instrument(skip(self, plan), fields(key = ?plan.key.as_str()))]
    async fn create(&self, plan: RelationModel) -> DiagResult<RelationModel> {
        let body = RelationCreate {
            key: plan.key.value_or_empty(),
            name: plan.name.value_or_empty(),
            description: known_string(&plan.description),
            subject_resource: plan.subject_resource.value_or_empty(),
        };

        let read = self
            .client
            .create_relation(&plan.object_resource.value_or_empty(), &body)
            .await
            .map_err(|e| client_error("create", "relation", e))?;
        info!(
            key = %read.key,
            subject = %read.subject_resource,
            object = %read.object_resource,
            "Permit relation created"
        );
        Ok(read.into())
    }

    async fn read(&self, state: RelationModel) -> DiagResult<RelationModel> {
        let read = self
            .client
            .get_relation(&state.object_resource.value_or_empty(), &state.key.value_or_empty())
            .await
            .map_err(|e| client_error("read", "relation", e))?;
        Ok(read.into())
    }

    async fn update(&self, _plan: RelationModel, _prior: RelationModel) -> DiagResult<RelationModel> {
        Err(unsupported_operation("permitio_relation", "update"))
    }

    async fn delete(&self, state: RelationModel) -> DiagResult<()> {
        self.client
            .delete_relation(&state.object_resource.value_or_empty(), &state.key.value_or_empty())
            .await
            .map_err(|e| client_error("delete", "relation", e))
    }
}
