//! Stateful in-memory stand-in for the Permit.io schema and facts APIs.
//!
//! Objects are stored per collection path (`resources`, `roles`,
//! `resources/document/roles`, ...) and keyed by their `key`. Responses
//! are decorated the way the real API decorates them: ids, timestamps and
//! per-type computed fields.

use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const API_KEY: &str = "permit_key_test123";
pub const PROJECT: &str = "proj-1";
pub const ENVIRONMENT: &str = "env-1";
const CREATED_AT: &str = "2024-05-01T12:00:00Z";
const UPDATED_AT: &str = "2024-05-02T09:30:00Z";

#[derive(Default)]
struct Store {
    collections: BTreeMap<String, BTreeMap<String, Value>>,
    calls: Vec<String>,
    next_id: u32,
}

#[derive(Clone, Default)]
struct StoreResponder {
    store: Arc<Mutex<Store>>,
}

/// Running mock server plus a handle on its store.
pub struct MockPermitServer {
    pub server: MockServer,
    store: Arc<Mutex<Store>>,
}

impl MockPermitServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let responder = StoreResponder::default();
        let store = responder.store.clone();

        Mock::given(method("GET"))
            .and(path("/v2/api-key/scope"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organization_id": "org-1",
                "project_id": PROJECT,
                "environment_id": ENVIRONMENT,
            })))
            .mount(&server)
            .await;

        Mock::given(path_regex(r"^/v2/(schema|facts)/[^/]+/[^/]+/.+$"))
            .respond_with(responder)
            .mount(&server)
            .await;

        Self { server, store }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Requests seen so far, as `"METHOD collection/key"`.
    pub fn calls(&self) -> Vec<String> {
        self.store.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.store.lock().unwrap().calls.clear();
    }

    pub fn stored(&self, collection: &str, key: &str) -> Option<Value> {
        self.store
            .lock()
            .unwrap()
            .collections
            .get(collection)
            .and_then(|c| c.get(key))
            .cloned()
    }
}

/// Split `/v2/{family}/{project}/{env}/rest...` into the segments after the scope.
fn scoped_segments(request: &Request) -> Vec<String> {
    request
        .url
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .skip(4)
        .map(str::to_string)
        .collect()
}

/// Collection paths end in a collection name; item paths add the key.
fn is_collection(segments: &[String]) -> bool {
    segments.len() % 2 == 1
}

impl Respond for StoreResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let segments = scoped_segments(request);
        let verb = request.method.as_str().to_string();
        let mut store = self.store.lock().unwrap();
        store.calls.push(format!("{verb} {}", segments.join("/")));

        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);

        if segments.last().map(String::as_str) == Some("implicit_grants") {
            return implicit_grant(&mut store, &segments, &verb, body);
        }

        if segments.last().map(String::as_str) == Some("set_rules") {
            let query: Map<String, Value> = request
                .url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), json!(v.into_owned())))
                .collect();
            return set_rule(&mut store, &verb, body, &query);
        }

        if is_collection(&segments) {
            let collection = segments.join("/");
            return match verb.as_str() {
                "POST" => {
                    let Some(key) = body.get("key").and_then(Value::as_str).map(str::to_string) else {
                        return ResponseTemplate::new(422).set_body_json(json!({"message": "key is required"}));
                    };
                    if store.collections.get(&collection).is_some_and(|c| c.contains_key(&key)) {
                        return ResponseTemplate::new(409)
                            .set_body_json(json!({"message": format!("{key} already exists")}));
                    }
                    store.next_id += 1;
                    let id = format!("{}-{}", segments[segments.len() - 1], store.next_id);
                    let object = decorate(&segments, &id, body, None);
                    store
                        .collections
                        .entry(collection)
                        .or_default()
                        .insert(key, object.clone());
                    ResponseTemplate::new(200).set_body_json(object)
                }
                _ => ResponseTemplate::new(405),
            };
        }

        let (key, parent) = segments.split_last().map(|(k, p)| (k.clone(), p.to_vec())).unwrap_or_default();
        let collection = parent.join("/");
        let existing = store
            .collections
            .get(&collection)
            .and_then(|c| c.get(&key).or_else(|| c.values().find(|o| o["id"] == key.as_str())))
            .cloned();
        let Some(existing) = existing else {
            return ResponseTemplate::new(404).set_body_json(json!({"message": format!("{key} not found")}));
        };
        let stored_key = existing["key"].as_str().unwrap_or_default().to_string();

        match verb.as_str() {
            "GET" => ResponseTemplate::new(200).set_body_json(existing),
            "PATCH" => {
                let id = existing["id"].as_str().unwrap_or_default().to_string();
                let object = decorate(&parent, &id, body, Some(&existing));
                store
                    .collections
                    .entry(collection)
                    .or_default()
                    .insert(stored_key, object.clone());
                ResponseTemplate::new(200).set_body_json(object)
            }
            "DELETE" => {
                if let Some(c) = store.collections.get_mut(&collection) {
                    c.remove(&stored_key);
                }
                ResponseTemplate::new(204)
            }
            _ => ResponseTemplate::new(405),
        }
    }
}

/// Build the stored object from a create or patch body.
fn decorate(collection: &[String], id: &str, body: Value, existing: Option<&Value>) -> Value {
    let mut object: Map<String, Value> = existing
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    if let Value::Object(fields) = body {
        object.extend(fields);
    }

    object.insert("id".into(), json!(id));
    object.insert("organization_id".into(), json!("org-1"));
    object.insert("project_id".into(), json!(PROJECT));
    object.insert("environment_id".into(), json!(ENVIRONMENT));
    object.insert("created_at".into(), json!(CREATED_AT));
    object.insert(
        "updated_at".into(),
        json!(if existing.is_some() { UPDATED_AT } else { CREATED_AT }),
    );

    let kind = collection.last().map(String::as_str).unwrap_or_default();
    match kind {
        "resources" => decorate_resource(&mut object),
        "roles" if collection.len() == 3 => {
            object.insert("resource".into(), json!(collection[1]));
            object.insert("resource_id".into(), json!(format!("resources-{}", collection[1])));
        }
        "condition_sets" => {
            if let Some(resource) = object.get("resource_id").and_then(Value::as_str).map(str::to_string) {
                object.insert("resource".into(), json!({"id": format!("resources-{resource}"), "key": resource}));
            }
        }
        "attributes" => {
            object.insert("resource_key".into(), json!(collection[1]));
            object.insert("resource_id".into(), json!(format!("resources-{}", collection[1])));
        }
        "relations" => {
            let subject = object.get("subject_resource").cloned().unwrap_or(Value::Null);
            let subject_id = json!(format!("resources-{}", subject.as_str().unwrap_or_default()));
            object.insert("subject_resource_id".into(), subject_id);
            object.insert("object_resource".into(), json!(collection[1]));
            object.insert("object_resource_id".into(), json!(format!("resources-{}", collection[1])));
        }
        "tenants" => {
            object.insert("last_action_at".into(), json!(UPDATED_AT));
        }
        "proxy_configs" => {
            object.remove("secret");
        }
        _ => {}
    }
    Value::Object(object)
}

fn decorate_resource(object: &mut Map<String, Value>) {
    for (field, prefix) in [("actions", "action"), ("attributes", "attribute")] {
        let Some(Value::Object(blocks)) = object.get_mut(field) else {
            continue;
        };
        for (key, block) in blocks.iter_mut() {
            if let Value::Object(block) = block {
                block.insert("id".into(), json!(format!("{prefix}-{key}")));
            }
        }
    }
}

fn set_rule(store: &mut Store, verb: &str, body: Value, query: &Map<String, Value>) -> ResponseTemplate {
    let rules = store.collections.entry("set_rules".into()).or_default();
    match verb {
        "POST" => {
            let key = rule_key(&body);
            let mut rule = body.as_object().cloned().unwrap_or_default();
            rule.insert("id".into(), json!(format!("rule-{}", rules.len() + 1)));
            rule.insert("organization_id".into(), json!("org-1"));
            rule.insert("project_id".into(), json!(PROJECT));
            rule.insert("environment_id".into(), json!(ENVIRONMENT));
            let rule = Value::Object(rule);
            rules.insert(key, rule.clone());
            ResponseTemplate::new(200).set_body_json(json!([rule]))
        }
        "DELETE" => {
            rules.remove(&rule_key(&body));
            ResponseTemplate::new(204)
        }
        "GET" => {
            let matching: Vec<Value> = rules
                .values()
                .filter(|rule| query.iter().all(|(k, v)| &rule[k] == v))
                .cloned()
                .collect();
            ResponseTemplate::new(200).set_body_json(Value::Array(matching))
        }
        _ => ResponseTemplate::new(405),
    }
}

fn rule_key(body: &Value) -> String {
    format!(
        "{}|{}|{}",
        body["user_set"].as_str().unwrap_or_default(),
        body["permission"].as_str().unwrap_or_default(),
        body["resource_set"].as_str().unwrap_or_default()
    )
}

/// `resources/{resource}/roles/{to_role}/implicit_grants` edits the target
/// role's `granted_to.users_with_role` list.
fn implicit_grant(store: &mut Store, segments: &[String], verb: &str, body: Value) -> ResponseTemplate {
    let collection = format!("resources/{}/roles", segments[1]);
    let Some(role) = store
        .collections
        .get_mut(&collection)
        .and_then(|c| c.get_mut(&segments[3]))
    else {
        return ResponseTemplate::new(404).set_body_json(json!({"message": "role not found"}));
    };

    let granted = role
        .as_object_mut()
        .map(|r| r.entry("granted_to").or_insert_with(|| json!({"users_with_role": []})));
    let Some(Value::Array(rules)) = granted.and_then(|g| g.get_mut("users_with_role")) else {
        return ResponseTemplate::new(500);
    };
    match verb {
        "POST" => {
            rules.push(body.clone());
            ResponseTemplate::new(200).set_body_json(body)
        }
        "DELETE" => {
            rules.retain(|r| r != &body);
            ResponseTemplate::new(204)
        }
        _ => ResponseTemplate::new(405),
    }
}
