//! `permitio_proxy_config`: upstream credentials and URL mapping rules for the
//! Permit proxy.

use crate::common::{
    ComputedIds, client_error, id_attributes, key_attribute, key_or_id, known_string,
    operation_error,
};
use permitio_client::PermitClient;
use permitio_client::models::{
    AuthMechanism, MappingRule, ProxyConfigCreate, ProxyConfigRead, ProxyConfigUpdate,
};
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSecretModel {
    pub bearer: Value<String>,
    pub basic: Value<String>,
    pub headers: Value<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingRuleModel {
    pub url: Value<String>,
    pub http_method: Value<String>,
    pub resource: Value<String>,
    pub action: Value<String>,
    pub priority: Value<i64>,
    pub headers: Value<BTreeMap<String, String>>,
}

impl MappingRuleModel {
    fn to_api(&self, index: usize) -> Result<MappingRule, String> {
        let priority = match self.priority.as_known() {
            Some(p) => Some(
                i32::try_from(*p)
                    .map_err(|_| format!("mapping_rules[{index}].priority {p} is out of range"))?,
            ),
            None => None,
        };
        Ok(MappingRule {
            url: self.url.value_or_empty(),
            http_method: self.http_method.value_or_empty(),
            resource: self.resource.value_or_empty(),
            action: known_string(&self.action),
            priority,
            headers: self.headers.as_known().cloned(),
        })
    }

    fn from_api(rule: MappingRule) -> Self {
        Self {
            url: Value::known(rule.url),
            http_method: Value::known(rule.http_method),
            resource: Value::known(rule.resource),
            action: rule.action.into(),
            priority: rule.priority.map(i64::from).into(),
            headers: rule.headers.filter(|h| !h.is_empty()).into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfigModel {
    #[serde(flatten)]
    pub ids: ComputedIds,
    pub key: Value<String>,
    pub name: Value<String>,
    pub auth_mechanism: Value<String>,
    pub auth_secret: Value<AuthSecretModel>,
    pub mapping_rules: Value<Vec<MappingRuleModel>>,
}

impl ProxyConfigModel {
    fn mechanism(&self) -> Result<AuthMechanism, String> {
        let raw = self.auth_mechanism.value_or_empty();
        AuthMechanism::parse(&raw).ok_or_else(|| format!("unknown auth_mechanism '{raw}'"))
    }

    /// The secret matching the mechanism, as sent to the API.
    fn secret(&self, mechanism: AuthMechanism) -> Json {
        let secret = self.auth_secret.as_known().cloned().unwrap_or_default();
        match mechanism {
            AuthMechanism::Basic => Json::from(secret.basic.value_or_empty()),
            AuthMechanism::Bearer => Json::from(secret.bearer.value_or_empty()),
            AuthMechanism::Headers => secret
                .headers
                .into_known()
                .map(|headers| {
                    Json::Object(
                        headers
                            .into_iter()
                            .map(|(k, v)| (k, Json::String(v)))
                            .collect(),
                    )
                })
                .unwrap_or(Json::Null),
        }
    }

    fn mapping_rules(&self) -> Result<Vec<MappingRule>, String> {
        self.mapping_rules
            .as_known()
            .map(|rules| rules.iter().enumerate().map(|(i, r)| r.to_api(i)).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn create_body(&self) -> Result<ProxyConfigCreate, String> {
        let mechanism = self.mechanism()?;
        Ok(ProxyConfigCreate {
            key: self.key.value_or_empty(),
            name: self.name.value_or_empty(),
            secret: self.secret(mechanism),
            auth_mechanism: mechanism,
            mapping_rules: self.mapping_rules()?,
        })
    }

    fn update_body(&self) -> Result<ProxyConfigUpdate, String> {
        let create = self.create_body()?;
        Ok(ProxyConfigUpdate {
            name: Some(create.name),
            secret: Some(create.secret),
            auth_mechanism: Some(create.auth_mechanism),
            mapping_rules: Some(create.mapping_rules),
        })
    }

    /// State from an API response. The returned secret lands in the field
    /// for its mechanism; the other secret fields keep their `prior` values.
    pub fn from_read(read: ProxyConfigRead, prior: &ProxyConfigModel) -> Self {
        let mut secret = prior.auth_secret.as_known().cloned().unwrap_or_default();
        match (read.auth_mechanism, read.secret) {
            (_, Json::Null) => {}
            (AuthMechanism::Basic, Json::String(s)) => secret.basic = Value::known(s),
            (AuthMechanism::Bearer, Json::String(s)) => secret.bearer = Value::known(s),
            (AuthMechanism::Headers, Json::Object(map)) => {
                secret.headers = Value::known(
                    map.into_iter()
                        .map(|(k, v)| match v {
                            Json::String(s) => (k, s),
                            other => (k, other.to_string()),
                        })
                        .collect(),
                );
            }
            _ => {}
        }

        Self {
            ids: ComputedIds::from(&read.ids),
            key: Value::known(read.key),
            name: Value::known(read.name),
            auth_mechanism: Value::known(read.auth_mechanism.as_str().to_string()),
            auth_secret: Value::known(secret),
            mapping_rules: Value::known(
                read.mapping_rules
                    .into_iter()
                    .map(MappingRuleModel::from_api)
                    .collect(),
            ),
        }
    }
}

/// Checks `auth_mechanism` against the allowed values.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthMechanismValidator;

impl StringValidator for AuthMechanismValidator {
    fn description(&self) -> String {
        let allowed: Vec<&str> = AuthMechanism::ALL.iter().map(AuthMechanism::as_str).collect();
        format!("auth_mechanism must be in [{}]", allowed.join(" "))
    }

    fn validate(&self, path: &AttributePath, value: &Value<String>, diags: &mut Diagnostics) {
        let Some(raw) = value.as_str() else {
            return;
        };
        if AuthMechanism::parse(raw).is_none() {
            diags.add_attribute_error(
                path.clone(),
                "Invalid auth_mechanism",
                format!("{}, got {raw}", self.description()),
            );
        }
    }
}

fn secret_path(field: &str) -> AttributePath {
    AttributePath::root("auth_secret").at_name(field)
}

/// Adapter for `permitio_proxy_config`.
pub struct ProxyConfigResource {
    client: Arc<PermitClient>,
}

impl ProxyConfigResource {
    pub fn new(client: Arc<PermitClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ProxyConfigResource {
    type Model = ProxyConfigModel;

    fn type_suffix(&self) -> &'static str {
        "proxy_config"
    }

    fn schema(&self) -> Schema {
        let secret = attributes([
            ("bearer", Attribute::string().optional().sensitive()),
            ("basic", Attribute::string().optional().sensitive()),
            ("headers", Attribute::map(ElementType::String).optional().sensitive()),
        ]);
        let rule = attributes([
            ("url", Attribute::string().required()),
            ("http_method", Attribute::string().required()),
            ("resource", Attribute::string().required()),
            ("action", Attribute::string().optional()),
            ("priority", Attribute::int64().optional()),
            ("headers", Attribute::map(ElementType::String).optional()),
        ]);

        let mut attrs = id_attributes();
        attrs.extend(attributes([
            ("key", key_attribute()),
            (
                "name",
                Attribute::string()
                    .required()
                    .with_description("The name of the proxy config, for example: 'Stripe API'"),
            ),
            (
                "auth_mechanism",
                Attribute::string()
                    .required()
                    .with_description(
                        "How the proxy authenticates upstream. Bearer injects the secret as a Bearer token, \
                         Basic injects it as Basic user:password, Headers injects plain headers.",
                    )
                    .with_validator(AuthMechanismValidator),
            ),
            (
                "auth_secret",
                Attribute::single_nested(secret)
                    .required()
                    .with_description("The secret the proxy uses to authenticate to the backend service."),
            ),
            (
                "mapping_rules",
                Attribute::list_nested(rule)
                    .required()
                    .with_description("Rules mapping a URL and HTTP method to a resource and action."),
            ),
        ]));
        Schema::new(attrs).with_description("Proxy config for making proxied requests as part of frontend authorization.")
    }

    fn config_validators(&self) -> Vec<ConfigValidator> {
        vec![ConfigValidator::Conflicting(vec![
            secret_path("basic"),
            secret_path("bearer"),
            secret_path("headers"),
        ])]
    }

    fn validate_config(&self, config: &ProxyConfigModel) -> DiagResult<()> {
        let (Some(mechanism), Some(secret)) = (config.auth_mechanism.as_str(), config.auth_secret.as_known())
        else {
            return Ok(());
        };

        let mechanism = mechanism.to_ascii_lowercase();
        let missing = match mechanism.as_str() {
            "basic" => secret.basic.is_null(),
            "bearer" => secret.bearer.is_null(),
            "headers" => secret.headers.is_null(),
            _ => false,
        };
        if missing {
            return Err(Diagnostic::error(
                format!("auth_mechanism was set to `{mechanism}` but auth_secret.{mechanism} is not set"),
                format!("Set auth_secret.{mechanism} or choose another auth_mechanism."),
            )
            .with_attribute(secret_path(&mechanism))
            .into());
        }
        Ok(())
    }

    #[instrument(skip(self, plan), fields(key = ?plan.key.as_str()))]
    async fn create(&self, plan: ProxyConfigModel) -> DiagResult<ProxyConfigModel> {
        let body = plan
            .create_body()
            .map_err(|e| operation_error("create", "proxy config", e))?;
        let read = self
            .client
            .create_proxy_config(&body)
            .await
            .map_err(|e| client_error("create", "proxy config", e))?;
        info!(key = %read.key, rules = read.mapping_rules.len(), "Permit proxy config created");
        Ok(ProxyConfigModel::from_read(read, &plan))
    }

    async fn read(&self, state: ProxyConfigModel) -> DiagResult<ProxyConfigModel> {
        let read = self
            .client
            .get_proxy_config(&key_or_id(&state.key, &state.ids.id))
            .await
            .map_err(|e| client_error("read", "proxy config", e))?;
        Ok(ProxyConfigModel::from_read(read, &state))
    }

    #[instrument(skip(self, plan, _prior), fields(key = ?plan.key.as_str()))]
    async fn update(&self, plan: ProxyConfigModel, _prior: ProxyConfigModel) -> DiagResult<ProxyConfigModel> {
        let body = plan
            .update_body()
            .map_err(|e| operation_error("update", "proxy config", e))?;
        let read = self
            .client
            .update_proxy_config(&plan.key.value_or_empty(), &body)
            .await
            .map_err(|e| client_error("update", "proxy config", e))?;
        info!(key = %read.key, "Permit proxy config updated");
        Ok(ProxyConfigModel::from_read(read, &plan))
    }

    async fn delete(&self, state: ProxyConfigModel) -> DiagResult<()> {
        self.client
            .delete_proxy_config(&state.key.value_or_empty())
            .await
            .map_err(|e| client_error("delete", "proxy config", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(value: Json) -> ProxyConfigModel {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_secret_follows_mechanism() {
        let m = model(json!({
            "key": "stripe",
            "name": "Stripe",
            "auth_mechanism": "Headers",
            "auth_secret": {"headers": {"X-Api-Key": "s3cr3t"}},
            "mapping_rules": [],
        }));
        let body = m.create_body().unwrap();
        assert_eq!(body.auth_mechanism, AuthMechanism::Headers);
        assert_eq!(body.secret, json!({"X-Api-Key": "s3cr3t"}));

        let m = model(json!({
            "auth_mechanism": "Basic",
            "auth_secret": {"basic": "user:pass"},
        }));
        assert_eq!(m.create_body().unwrap().secret, json!("user:pass"));
    }

    #[test]
    fn test_priority_must_fit_i32() {
        let m = model(json!({
            "auth_mechanism": "Bearer",
            "auth_secret": {"bearer": "t"},
            "mapping_rules": [{"url": "https://a", "http_method": "get", "resource": "r", "priority": 4_000_000_000_i64}],
        }));
        let err = m.create_body().unwrap_err();
        assert!(err.contains("mapping_rules[0].priority"));
    }

    #[test]
    fn test_from_read_keeps_other_secrets() {
        let prior = model(json!({
            "auth_mechanism": "Bearer",
            "auth_secret": {"bearer": "old", "basic": "kept"},
        }));
        let read: ProxyConfigRead = serde_json::from_value(json!({
            "id": "pc-1",
            "organization_id": "o",
            "project_id": "p",
            "environment_id": "e",
            "key": "stripe",
            "name": "Stripe",
            "secret": "new",
            "auth_mechanism": "Bearer",
            "mapping_rules": [{"url": "https://a", "http_method": "get", "resource": "r", "headers": {}}],
        }))
        .unwrap();

        let state = ProxyConfigModel::from_read(read, &prior);
        let secret = state.auth_secret.as_known().unwrap();
        assert_eq!(secret.bearer.as_str(), Some("new"));
        assert_eq!(secret.basic.as_str(), Some("kept"));
        let rules = state.mapping_rules.as_known().unwrap();
        assert!(rules[0].headers.is_null());
        assert!(rules[0].priority.is_null());
    }

    #[test]
    fn test_mechanism_validator() {
        let path = AttributePath::root("auth_mechanism");
        let mut diags = Diagnostics::new();
        AuthMechanismValidator.validate(&path, &"Bearer".into(), &mut diags);
        AuthMechanismValidator.validate(&path, &Value::Unknown, &mut diags);
        assert!(diags.is_empty());

        AuthMechanismValidator.validate(&path, &"OAuth".into(), &mut diags);
        let d = diags.iter().next().unwrap();
        assert_eq!(d.summary, "Invalid auth_mechanism");
        assert_eq!(d.detail, "auth_mechanism must be in [Bearer Basic Headers], got OAuth");
    }
}
