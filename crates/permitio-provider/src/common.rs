//! Schema fragments and conversions shared by the adapters.

use chrono::{DateTime, Utc};
use permitio_client::PermitError;
use permitio_client::models::ObjectIds;
use permitio_framework::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

/// Attribute types accepted by the API for resource and user attributes.
pub const ATTRIBUTE_TYPES: [&str; 8] = [
    "bool",
    "number",
    "string",
    "time",
    "array",
    "json",
    "object",
    "object_array",
];

/// Server-assigned identifiers present on most objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedIds {
    pub id: Value<String>,
    pub organization_id: Value<String>,
    pub project_id: Value<String>,
    pub environment_id: Value<String>,
}

impl From<&ObjectIds> for ComputedIds {
    fn from(ids: &ObjectIds) -> Self {
        Self {
            id: Value::known(ids.id.clone()),
            organization_id: Value::known(ids.organization_id.clone()),
            project_id: Value::known(ids.project_id.clone()),
            environment_id: Value::known(ids.environment_id.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timestamps {
    pub created_at: Value<String>,
    pub updated_at: Value<String>,
}

impl Timestamps {
    pub fn new(created_at: &DateTime<Utc>, updated_at: &DateTime<Utc>) -> Self {
        Self {
            created_at: timestamp(created_at),
            updated_at: timestamp(updated_at),
        }
    }
}

fn computed_string(description: &str) -> Attribute {
    Attribute::string()
        .computed()
        .with_description(description)
        .with_plan_modifier(PlanModifier::UseStateForUnknown)
}

/// `id`, `organization_id`, `project_id` and `environment_id`.
pub fn id_attributes() -> BTreeMap<String, Attribute> {
    attributes([
        (
            "id",
            computed_string("The object ID. This is a unique identifier for the object."),
        ),
        (
            "organization_id",
            computed_string("The organization ID. This is a unique identifier for the organization."),
        ),
        (
            "project_id",
            computed_string("The project ID. This is a unique identifier for the project."),
        ),
        (
            "environment_id",
            computed_string("The environment ID. This is a unique identifier for the environment."),
        ),
    ])
}

/// Immutable `key` attribute.
pub fn key_attribute() -> Attribute {
    Attribute::string()
        .required()
        .with_description("The key. This is a unique identifier.")
        .with_plan_modifier(PlanModifier::RequiresReplace)
}

/// Shared base schema: ids, timestamps, `key`, `name` and `description`.
pub fn base_attributes() -> BTreeMap<String, Attribute> {
    let mut attrs = id_attributes();
    attrs.extend(attributes([
        (
            "created_at",
            computed_string("The creation timestamp. This is a timestamp for when the object was created."),
        ),
        (
            "updated_at",
            Attribute::string()
                .optional()
                .computed()
                .with_description("The update timestamp. This is a timestamp for when the object was last updated."),
        ),
        ("key", key_attribute()),
        (
            "name",
            Attribute::string()
                .required()
                .with_description("The name. This is a human-readable name for the object."),
        ),
        (
            "description",
            Attribute::string()
                .optional()
                .computed()
                .with_description("The description. This is a human-readable description for the object."),
        ),
    ]));
    attrs
}

/// String attribute that forces replacement when changed.
pub fn replacing_string(description: &str) -> Attribute {
    Attribute::string()
        .required()
        .with_description(description)
        .with_plan_modifier(PlanModifier::RequiresReplace)
}

/// The key when set, otherwise the id.
pub fn key_or_id(key: &Value<String>, id: &Value<String>) -> String {
    match key {
        Value::Known(key) => key.clone(),
        _ => id.value_or_empty(),
    }
}

/// Wrap a client error into a diagnostic, e.g. "Unable to create role".
pub fn client_error(action: &str, object: &str, err: PermitError) -> Diagnostics {
    Diagnostic::error(
        format!("Unable to {action} {object}"),
        format!("unable to {action} {object}: {err}"),
    )
    .into()
}

/// Diagnostic for a failure that happened before or after the API call.
pub fn operation_error(action: &str, object: &str, detail: impl std::fmt::Display) -> Diagnostics {
    Diagnostic::error(
        format!("Unable to {action} {object}"),
        format!("unable to {action} {object}: {detail}"),
    )
    .into()
}

pub fn timestamp(value: &DateTime<Utc>) -> Value<String> {
    Value::known(value.to_rfc3339())
}

/// Known strings pass through; null and unknown become `None`.
pub fn known_string(value: &Value<String>) -> Option<String> {
    value.as_known().cloned()
}

/// Elements of a string set or list. Null and unknown yield an empty list.
pub fn string_elements(value: &Value<Vec<String>>) -> Vec<String> {
    value.as_known().cloned().unwrap_or_default()
}

/// Optional API string; empty strings read back as null.
pub fn non_empty(value: Option<String>) -> Value<String> {
    match value {
        Some(s) if !s.is_empty() => Value::Known(s),
        _ => Value::Null,
    }
}

/// Parse a JSON-encoded object attribute.
pub fn parse_json_object(raw: &str) -> Result<Map<String, Json>, String> {
    match serde_json::from_str::<Json>(raw) {
        Ok(Json::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {}", json_kind(&other))),
        Err(e) => Err(e.to_string()),
    }
}

/// Encode an echoed object for state. The `configured` string is kept
/// verbatim when it decodes to the same object.
pub fn encode_json_object(
    attribute: &str,
    configured: Option<&str>,
    echoed: &Map<String, Json>,
) -> DiagResult<String> {
    if let Some(raw) = configured {
        if parse_json_object(raw).is_ok_and(|parsed| &parsed == echoed) {
            return Ok(raw.to_string());
        }
    }
    serde_json::to_string(echoed).map_err(|e| {
        Diagnostic::error(
            format!("Unable to encode {attribute}"),
            format!("unable to encode {attribute}: {e}"),
        )
        .with_attribute(AttributePath::root(attribute))
        .into()
    })
}

fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

/// Checks that a string is one of [`ATTRIBUTE_TYPES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeTypeValidator;

impl StringValidator for AttributeTypeValidator {
    fn description(&self) -> String {
        "The type of the attribute in the resource.".to_string()
    }

    fn validate(&self, path: &AttributePath, value: &Value<String>, diags: &mut Diagnostics) {
        match value {
            Value::Unknown => {}
            Value::Null => diags.add_attribute_error(
                path.clone(),
                "Invalid resource attribute type",
                format!("Invalid null resource attribute type: {path}"),
            ),
            Value::Known(v) if !ATTRIBUTE_TYPES.contains(&v.as_str()) => diags.add_attribute_error(
                path.clone(),
                "Invalid resource attribute type",
                format!(
                    "Invalid resource attribute type: {v}. Valid types are: {}",
                    ATTRIBUTE_TYPES.join(", ")
                ),
            ),
            Value::Known(_) => {}
        }
    }
}
