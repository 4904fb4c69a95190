//! Shared fixtures for client tests.

#![allow(dead_code)]

use permitio_client::{PermitClient, PermitConfig};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "permit_key_test123";
pub const PROJECT: &str = "proj-1";
pub const ENVIRONMENT: &str = "env-1";
pub const TIMESTAMP: &str = "2024-05-01T12:00:00Z";

/// Client pointing at the mock server.
pub fn test_client(server: &MockServer) -> PermitClient {
    PermitClient::with_http_client(
        PermitConfig::new(API_KEY).with_api_url(server.uri()),
        reqwest::Client::new(),
    )
    .unwrap()
}

/// Mount the API key scope lookup, expected exactly once.
pub async fn mount_scope(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/api-key/scope"))
        .and(header("Authorization", format!("Bearer {API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organization_id": "org-1",
            "project_id": PROJECT,
            "environment_id": ENVIRONMENT,
        })))
        .expect(1)
        .mount(server)
        .await;
}

pub fn schema_path(suffix: &str) -> String {
    format!("/v2/schema/{PROJECT}/{ENVIRONMENT}/{suffix}")
}

pub fn facts_path(suffix: &str) -> String {
    format!("/v2/facts/{PROJECT}/{ENVIRONMENT}/{suffix}")
}

fn ids(id: &str) -> Value {
    json!({
        "id": id,
        "organization_id": "org-1",
        "project_id": PROJECT,
        "environment_id": ENVIRONMENT,
    })
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    base
}

pub fn role_json(key: &str, permissions: &[&str]) -> Value {
    merge(
        ids(&format!("role-{key}")),
        json!({
            "key": key,
            "name": key.to_uppercase(),
            "permissions": permissions,
            "extends": [],
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        }),
    )
}

pub fn resource_json(key: &str, actions: &[&str]) -> Value {
    let actions: serde_json::Map<String, Value> = actions
        .iter()
        .map(|a| (a.to_string(), json!({"id": format!("action-{a}"), "name": a})))
        .collect();
    merge(
        ids(&format!("res-{key}")),
        json!({
            "key": key,
            "name": key,
            "actions": actions,
            "attributes": {},
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        }),
    )
}

pub fn set_rule_json(user_set: &str, permission: &str, resource_set: &str) -> Value {
    merge(
        ids("rule-1"),
        json!({
            "user_set": user_set,
            "permission": permission,
            "resource_set": resource_set,
        }),
    )
}
