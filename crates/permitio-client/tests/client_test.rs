//! Client tests: scope caching, auth headers, status mapping and endpoint shapes.

mod helpers;

use helpers::*;
use permitio_client::models::{
    ConditionSetCreate, ConditionSetType, DerivedRoleRule, RoleCreate, SetRule,
};
use permitio_client::{PermitClient, PermitConfig, PermitError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ═══════════════════════════════════════════════════════════════════════════
// Scope and authentication
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_scope_is_fetched_once() {
    let server = MockServer::start().await;
    mount_scope(&server).await;

    Mock::given(method("GET"))
        .and(path(schema_path("roles/viewer")))
        .respond_with(ResponseTemplate::new(200).set_body_json(role_json("viewer", &["doc:read"])))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let shared = client.clone();
    client.get_role("viewer").await.unwrap();
    shared.get_role("viewer").await.unwrap();

    let scope = client.scope().await.unwrap();
    assert_eq!(scope.project_id.as_deref(), Some(PROJECT));
}

#[tokio::test]
async fn test_requests_carry_bearer_and_user_agent() {
    let server = MockServer::start().await;
    mount_scope(&server).await;

    Mock::given(method("GET"))
        .and(path(schema_path("resources/document")))
        .and(header("Authorization", format!("Bearer {API_KEY}").as_str()))
        .and(header("User-Agent", permitio_client::USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(resource_json("document", &["read"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = PermitClient::new(PermitConfig::new(API_KEY).with_api_url(server.uri())).unwrap();
    let resource = client.get_resource("document").await.unwrap();
    assert_eq!(resource.actions["read"].id, "action-read");
}

#[tokio::test]
async fn test_unscoped_key_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/api-key/scope"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organization_id": "org-1"})))
        .mount(&server)
        .await;

    let err = test_client(&server).get_role("viewer").await.unwrap_err();
    assert!(matches!(err, PermitError::InvalidConfiguration(_)), "{err:?}");
}

// ═══════════════════════════════════════════════════════════════════════════
// Status mapping
// ═══════════════════════════════════════════════════════════════════════════

async fn error_for(status: u16, body: serde_json::Value) -> PermitError {
    let server = MockServer::start().await;
    mount_scope(&server).await;
    Mock::given(method("GET"))
        .and(path(schema_path("roles/viewer")))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(body)
                .insert_header("Retry-After", "7"),
        )
        .mount(&server)
        .await;
    test_client(&server).get_role("viewer").await.unwrap_err()
}

#[tokio::test]
async fn test_status_mapping() {
    let msg = json!({"message": "nope"});

    assert!(matches!(error_for(401, msg.clone()).await, PermitError::Unauthorized(m) if m == "nope"));
    assert!(matches!(error_for(403, msg.clone()).await, PermitError::Forbidden(_)));
    assert!(error_for(404, msg.clone()).await.is_not_found());
    assert!(matches!(error_for(409, msg.clone()).await, PermitError::Conflict(_)));
    assert!(matches!(
        error_for(422, json!({"detail": "key is invalid"})).await,
        PermitError::Validation(m) if m == "key is invalid"
    ));
    assert!(matches!(
        error_for(429, msg.clone()).await,
        PermitError::RateLimited { retry_after_secs: Some(7) }
    ));
    let err = error_for(502, msg).await;
    assert!(matches!(err, PermitError::Api { status: 502, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_serialization_error() {
    let server = MockServer::start().await;
    mount_scope(&server).await;
    Mock::given(method("GET"))
        .and(path(schema_path("roles/viewer")))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = test_client(&server).get_role("viewer").await.unwrap_err();
    assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/api-key/scope"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = PermitClient::new(
        PermitConfig::new(API_KEY)
            .with_api_url(server.uri())
            .with_timeout(Duration::from_millis(100)),
    )
    .unwrap();
    let err = client.scope().await.unwrap_err();
    assert!(matches!(err, PermitError::Timeout), "{err:?}");
}

// ═══════════════════════════════════════════════════════════════════════════
// Endpoint shapes
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_resource_role_paths() {
    let server = MockServer::start().await;
    mount_scope(&server).await;

    Mock::given(method("POST"))
        .and(path(schema_path("resources/document/roles")))
        .and(body_json(json!({
            "key": "editor",
            "name": "Editor",
            "permissions": ["write"],
            "extends": [],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json({
            let mut role = role_json("editor", &["write"]);
            role["resource"] = json!("document");
            role["resource_id"] = json!("res-document");
            role
        }))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(schema_path("resources/document/roles/editor")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let role = client
        .create_resource_role(
            "document",
            &RoleCreate {
                key: "editor".into(),
                name: "Editor".into(),
                description: None,
                permissions: vec!["write".into()],
                extends: vec![],
            },
        )
        .await
        .unwrap();
    assert_eq!(role.resource.as_deref(), Some("document"));

    client.delete_resource_role("document", "editor").await.unwrap();
}

#[tokio::test]
async fn test_condition_set_body() {
    let server = MockServer::start().await;
    mount_scope(&server).await;

    Mock::given(method("POST"))
        .and(path(schema_path("condition_sets")))
        .and(body_json(json!({
            "key": "private_docs",
            "name": "Private docs",
            "type": "resourceset",
            "resource_id": "document",
            "conditions": {"allOf": [{"resource.private": {"equals": true}}]},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs-1",
            "organization_id": "org-1",
            "project_id": PROJECT,
            "environment_id": ENVIRONMENT,
            "key": "private_docs",
            "name": "Private docs",
            "type": "resourceset",
            "resource_id": "res-document",
            "resource": {"id": "res-document", "key": "document"},
            "conditions": {"allOf": [{"resource.private": {"equals": true}}]},
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let conditions = json!({"allOf": [{"resource.private": {"equals": true}}]});
    let read = test_client(&server)
        .create_condition_set(&ConditionSetCreate {
            key: "private_docs".into(),
            name: "Private docs".into(),
            description: None,
            set_type: ConditionSetType::ResourceSet,
            resource_id: Some("document".into()),
            conditions: conditions.as_object().unwrap().clone(),
            parent_id: None,
        })
        .await
        .unwrap();

    assert_eq!(read.set_type, ConditionSetType::ResourceSet);
    assert_eq!(read.resource.unwrap().key, "document");
}

#[tokio::test]
async fn test_set_rule_calls() {
    let server = MockServer::start().await;
    mount_scope(&server).await;
    let rule = SetRule {
        user_set: "admins".into(),
        permission: "document:read".into(),
        resource_set: "private_docs".into(),
    };

    Mock::given(method("POST"))
        .and(path(facts_path("set_rules")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            set_rule_json("admins", "document:read", "private_docs")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(facts_path("set_rules")))
        .and(query_param("user_set", "admins"))
        .and(query_param("permission", "document:read"))
        .and(query_param("resource_set", "private_docs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(facts_path("set_rules")))
        .and(body_json(json!({
            "user_set": "admins",
            "permission": "document:read",
            "resource_set": "private_docs",
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let created = client.assign_set_permission(&rule).await.unwrap();
    assert_eq!(created[0].ids.id, "rule-1");
    assert!(client.list_set_permissions(&rule).await.unwrap().is_empty());
    client.unassign_set_permission(&rule).await.unwrap();
}

#[tokio::test]
async fn test_implicit_grant_body() {
    let server = MockServer::start().await;
    mount_scope(&server).await;
    let rule = DerivedRoleRule {
        role: "owner".into(),
        on_resource: "folder".into(),
        linked_by_relation: "parent".into(),
    };

    Mock::given(method("POST"))
        .and(path(schema_path("resources/document/roles/editor/implicit_grants")))
        .and(body_json(json!({
            "role": "owner",
            "on_resource": "folder",
            "linked_by_relation": "parent",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "role_id": "r-1",
            "resource_id": "res-folder",
            "role": "owner",
            "on_resource": "folder",
            "linked_by_relation": "parent",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = test_client(&server)
        .create_implicit_grant("document", "editor", &rule)
        .await
        .unwrap();
    assert_eq!(created, rule);
}
