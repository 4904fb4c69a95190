//! Command tests against a wiremock API and temporary state files.

use permitio_client::{PermitClient, PermitConfig};
use permitio_provider::PermitProvider;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use terraform_provider_permitio::commands::apply::{self, ApplyArgs};
use terraform_provider_permitio::commands::destroy::{self, DestroyArgs};
use terraform_provider_permitio::commands::plan::{self, PlanArgs};
use terraform_provider_permitio::commands::refresh::{self, RefreshArgs};
use terraform_provider_permitio::commands::validate::{self, ValidateArgs};
use terraform_provider_permitio::commands::{Context, TypeArgs};
use terraform_provider_permitio::CliError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROLE_PATH: &str = "/v2/schema/proj-1/env-1/roles";

fn role_json(name: &str) -> Value {
    json!({
        "id": "role-1",
        "organization_id": "org-1",
        "project_id": "proj-1",
        "environment_id": "env-1",
        "key": "viewer",
        "name": name,
        "permissions": ["document:read"],
        "extends": [],
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-01T12:00:00Z",
    })
}

async fn mock_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/api-key/scope"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organization_id": "org-1",
            "project_id": "proj-1",
            "environment_id": "env-1",
        })))
        .mount(&server)
        .await;
    server
}

fn context(server: &MockServer) -> Context {
    let client = PermitClient::with_http_client(
        PermitConfig::new("permit_key_test123").with_api_url(server.uri()),
        reqwest::Client::new(),
    )
    .unwrap();
    Context::new(PermitProvider::registry(Arc::new(client)))
}

fn write(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

fn role_type() -> TypeArgs {
    TypeArgs {
        type_name: "permitio_role".into(),
    }
}

#[tokio::test]
async fn test_apply_refresh_destroy_round_trip() {
    let server = mock_server().await;
    Mock::given(method("POST"))
        .and(path(ROLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(role_json("Viewer")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{ROLE_PATH}/viewer")))
        .respond_with(ResponseTemplate::new(200).set_body_json(role_json("Viewer")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ROLE_PATH}/viewer")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "viewer.json",
        &json!({"key": "viewer", "name": "Viewer", "permissions": ["document:read"]}),
    );
    let state = dir.path().join("viewer.tfstate.json");

    apply::execute(
        ApplyArgs {
            target: role_type(),
            config: config.clone(),
            state: state.clone(),
        },
        &ctx,
    )
    .await
    .unwrap();
    let written: Value = serde_json::from_str(&fs::read_to_string(&state).unwrap()).unwrap();
    assert_eq!(written["id"], "role-1");
    assert_eq!(written["created_at"], "2024-05-01T12:00:00+00:00");

    // Unchanged config: no request is made.
    apply::execute(
        ApplyArgs {
            target: role_type(),
            config,
            state: state.clone(),
        },
        &ctx,
    )
    .await
    .unwrap();

    refresh::execute(
        RefreshArgs {
            target: role_type(),
            state: state.clone(),
        },
        &ctx,
    )
    .await
    .unwrap();

    destroy::execute(
        DestroyArgs {
            target: role_type(),
            state: state.clone(),
        },
        &ctx,
    )
    .await
    .unwrap();
    assert!(!state.exists());
}

#[tokio::test]
async fn test_failed_replacement_discards_state_and_retry_creates() {
    let server = mock_server().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ROLE_PATH}/viewer")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ROLE_PATH))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "bad"})))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    let mut reader = role_json("Reader");
    reader["key"] = json!("reader");
    Mock::given(method("POST"))
        .and(path(ROLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reader))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let dir = tempfile::tempdir().unwrap();
    let state = write(dir.path(), "state.json", &role_json("Viewer"));
    let config = write(
        dir.path(),
        "reader.json",
        &json!({"key": "reader", "name": "Reader", "permissions": ["document:read"]}),
    );
    let args = || ApplyArgs {
        target: role_type(),
        config: config.clone(),
        state: state.clone(),
    };

    let err = apply::execute(args(), &ctx).await.unwrap_err();
    assert_eq!(err.exit_code(), 1);
    let CliError::Diagnostics(diags) = &err else {
        panic!("expected diagnostics");
    };
    assert_eq!(diags.iter().next().unwrap().summary, "Unable to create role");
    assert!(!state.exists());

    apply::execute(args(), &ctx).await.unwrap();
    let written: Value = serde_json::from_str(&fs::read_to_string(&state).unwrap()).unwrap();
    assert_eq!(written["key"], "reader");
}

#[tokio::test]
async fn test_api_error_keeps_state_file() {
    let server = mock_server().await;
    Mock::given(method("GET"))
        .and(path(format!("{ROLE_PATH}/viewer")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    let ctx = context(&server);
    let dir = tempfile::tempdir().unwrap();
    let state = write(dir.path(), "state.json", &role_json("Viewer"));

    let err = refresh::execute(
        RefreshArgs {
            target: role_type(),
            state: state.clone(),
        },
        &ctx,
    )
    .await
    .unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(state.exists());
}

#[tokio::test]
async fn test_validate_and_plan_make_no_requests() {
    let server = mock_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let dir = tempfile::tempdir().unwrap();

    let valid = write(dir.path(), "valid.json", &json!({"key": "viewer", "name": "Viewer"}));
    validate::execute(
        ValidateArgs {
            target: role_type(),
            config: valid.clone(),
        },
        &ctx,
    )
    .unwrap();

    plan::execute(
        PlanArgs {
            target: role_type(),
            config: valid,
            state: Some(dir.path().join("missing.json")),
        },
        &ctx,
    )
    .unwrap();

    let invalid = write(dir.path(), "invalid.json", &json!({"key": "viewer"}));
    let err = validate::execute(
        ValidateArgs {
            target: role_type(),
            config: invalid,
        },
        &ctx,
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 1);
    let CliError::Diagnostics(diags) = err else {
        panic!("expected diagnostics");
    };
    assert_eq!(diags.iter().next().unwrap().summary, "Missing required argument");
}

#[tokio::test]
async fn test_unknown_type_and_missing_state_are_usage_errors() {
    let server = mock_server().await;
    let ctx = context(&server);
    let dir = tempfile::tempdir().unwrap();

    let err = ctx.lifecycle("permitio_user").err().unwrap();
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("permitio_user"));

    let err = destroy::execute(
        DestroyArgs {
            target: role_type(),
            state: dir.path().join("missing.json"),
        },
        &ctx,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_context_load_reports_missing_provider_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Context::load(Some(&dir.path().join("provider.json"))).err().unwrap();
    assert_eq!(err.exit_code(), 2);
}
