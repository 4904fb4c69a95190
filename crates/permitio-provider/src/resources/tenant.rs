//! `permitio_tenant`.

use crate::common::{
    ComputedIds, Timestamps, base_attributes, client_error, encode_json_object, key_or_id,
    known_string, operation_error, parse_json_object, timestamp,
};
use permitio_client::PermitClient;
use permitio_client::models::{TenantCreate, TenantRead, TenantUpdate};
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TenantModel {
    #[serde(flatten)]
    pub ids: ComputedIds,
    #[serde(flatten)]
    pub timestamps: Timestamps,
    pub last_action_at: Value<String>,
    pub key: Value<String>,
    pub name: Value<String>,
    pub description: Value<String>,
    /// JSON-encoded object.
    pub attributes: Value<String>,
}

impl TenantModel {
    /// Attributes to send; empty and unset strings are omitted.
    fn attributes_object(&self) -> Result<Option<Map<String, Json>>, String> {
        match self.attributes.as_str() {
            Some(raw) if !raw.is_empty() => parse_json_object(raw).map(Some),
            _ => Ok(None),
        }
    }

    fn from_read(read: TenantRead, configured: Option<&str>) -> DiagResult<Self> {
        let attributes = match read.attributes.as_ref() {
            Some(map) if !map.is_empty() => Value::known(encode_json_object("attributes", configured, map)?),
            _ => Value::Null,
        };
        Ok(Self {
            ids: ComputedIds::from(&read.ids),
            timestamps: Timestamps::new(&read.created_at, &read.updated_at),
            last_action_at: timestamp(&read.last_action_at),
            key: Value::known(read.key),
            name: Value::known(read.name),
            description: read.description.into(),
            attributes,
        })
    }
}

/// Adapter for `permitio_tenant`.
pub struct TenantResource {
    client: Arc<PermitClient>,
}

impl TenantResource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for TenantResource {
    type Model = TenantModel;

    fn type_suffix(&self) -> &'static str {
        "tenant"
    }

    fn schema(&self) -> Schema {
        let mut attrs = base_attributes();
        attrs.extend(attributes([
            (
                "last_action_at",
                Attribute::string()
                    .computed()
                    .with_description("Last time a user in this tenant performed an action."),
            ),
            (
                "attributes",
                Attribute::string()
                    .optional()
                    .computed()
                    .with_description("Arbitrary tenant attributes, encoded as a JSON object."),
            ),
        ]));
        Schema::new(attrs).with_description("A tenant: an isolated group of users and resources.")
    }

    fn validate_config(&self, config: &TenantModel) -> DiagResult<()> {
        config.attributes_object().map(|_| ()).map_err(|e| {
            Diagnostic::error("Invalid attributes", format!("attributes must be a JSON object: {e}"))
                .with_attribute(AttributePath::root("attributes"))
                .into()
        })
    }

    #[instrument(skip(self, plan), fields(key = ?plan.key.as_str()))]
    async fn create(&self, plan: TenantModel) -> DiagResult<TenantModel> {
        let body = TenantCreate {
            key: plan.key.value_or_empty(),
            name: plan.name.value_or_empty(),
            description: known_string(&plan.description),
            attributes: plan
                .attributes_object()
                .map_err(|e| operation_error("create", "tenant", e))?,
        };

        let read = self
            .client
            .create_tenant(&body)
            .await
            .map_err(|e| client_error("create", "tenant", e))?;
        info!(key = %read.key, "Permit tenant created");
        TenantModel::from_read(read, plan.attributes.as_str())
    }

    async fn read(&self, state: TenantModel) -> DiagResult<TenantModel> {
        let read = self
            .client
            .get_tenant(&key_or_id(&state.key, &state.ids.id))
            .await
            .map_err(|e| client_error("read", "tenant", e))?;
        TenantModel::from_read(read, state.attributes.as_str())
    }

    #[instrument(skip(self, plan, _prior), fields(key = ?plan.key.as_str()))]
    async fn update(&self, plan: TenantModel, _prior: TenantModel) -> DiagResult<TenantModel> {
        let body = TenantUpdate {
            name: known_string(&plan.name),
            description: known_string(&plan.description),
            attributes: plan
                .attributes_object()
                .map_err(|e| operation_error("update", "tenant", e))?,
        };

        let read = self
            .client
            .update_tenant(&plan.key.value_or_empty(), &body)
            .await
            .map_err(|e| client_error("update", "tenant", e))?;
        info!(key = %read.key, "Permit tenant updated");
        TenantModel::from_read(read, plan.attributes.as_str())
    }

    async fn delete(&self, state: TenantModel) -> DiagResult<()> {
        self.client
            .delete_tenant(&state.key.value_or_empty())
            .await
            .map_err(|e| client_error("delete", "tenant", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tenant_read(attributes: Json) -> TenantRead {
        serde_json::from_value(json!({
            "id": "t-1",
            "organization_id": "o",
            "project_id": "p",
            "environment_id": "e",
            "key": "acme",
            "name": "Acme",
            "attributes": attributes,
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z",
            "last_action_at": "2024-05-02T08:30:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_attributes_not_sent() {
        let mut model = TenantModel {
            attributes: "".into(),
            ..Default::default()
        };
        assert_eq!(model.attributes_object().unwrap(), None);
        model.attributes = Value::Null;
        assert_eq!(model.attributes_object().unwrap(), None);
        model.attributes = r#"{"tier": "gold"}"#.into();
        assert_eq!(model.attributes_object().unwrap().unwrap()["tier"], "gold");
    }

    #[test]
    fn test_empty_attributes_read_back_as_null() {
        let state = TenantModel::from_read(tenant_read(json!({})), Some("")).unwrap();
        assert!(state.attributes.is_null());
        let state = TenantModel::from_read(tenant_read(Json::Null), None).unwrap();
        assert!(state.attributes.is_null());
        assert_eq!(state.last_action_at.as_str(), Some("2024-05-02T08:30:00+00:00"));
    }

    #[test]
    fn test_attributes_round_trip() {
        let configured = r#"{"tier": "gold", "seats": 10}"#;
        let state = TenantModel::from_read(
            tenant_read(json!({"seats": 10, "tier": "gold"})),
            Some(configured),
        )
        .unwrap();
        assert_eq!(state.attributes.as_str(), Some(configured));
    }
}
