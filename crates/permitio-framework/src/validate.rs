//! Static validation of configuration objects against a schema.
//!
//! Runs before any plan is produced, so nothing here touches the network.

use crate::diag::Diagnostics;
use crate::path::AttributePath;
use crate::schema::{Attribute, AttributeKind, Schema};
use crate::value::{NULL, Value, is_unknown};
use serde::Serialize;
use serde_json::Value as Json;
use std::collections::BTreeMap;

/// Cross-attribute configuration rule.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "rule", content = "paths", rename_all = "snake_case")]
pub enum ConfigValidator {
    /// At most one of the paths may be configured.
    Conflicting(Vec<AttributePath>),
}

impl ConfigValidator {
    pub fn check(&self, config: &Json, diags: &mut Diagnostics) {
        match self {
            Self::Conflicting(paths) => {
                let configured: Vec<&AttributePath> = paths
                    .iter()
                    .filter(|p| p.lookup(config).is_some_and(|v| !v.is_null()))
                    .collect();
                if configured.len() > 1 {
                    let listed = paths
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(",");
                    diags.add_attribute_error(
                        configured[0].clone(),
                        "Invalid Attribute Combination",
                        format!("These attributes cannot be configured together: [{listed}]"),
                    );
                }
            }
        }
    }
}

/// Validate a configuration object against a schema.
pub fn validate_config(schema: &Schema, config: &Json) -> Diagnostics {
    let mut diags = Diagnostics::new();
    match config {
        Json::Object(map) => validate_object(None, &schema.attributes, map, &mut diags),
        Json::Null => validate_object(None, &schema.attributes, &serde_json::Map::new(), &mut diags),
        other => diags.add_error(
            "Invalid configuration",
            format!("Expected a configuration object, got {}", json_type(other)),
        ),
    }
    diags
}

/// Run every cross-attribute rule.
pub fn check_config_validators(validators: &[ConfigValidator], config: &Json) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for validator in validators {
        validator.check(config, &mut diags);
    }
    diags
}

fn child_path(parent: Option<&AttributePath>, name: &str) -> AttributePath {
    match parent {
        Some(p) => p.at_name(name),
        None => AttributePath::root(name),
    }
}

fn validate_object(
    parent: Option<&AttributePath>,
    attributes: &BTreeMap<String, Attribute>,
    config: &serde_json::Map<String, Json>,
    diags: &mut Diagnostics,
) {
    for name in config.keys() {
        if !attributes.contains_key(name) {
            diags.add_attribute_error(
                child_path(parent, name),
                "Unsupported argument",
                format!("An argument named \"{name}\" is not expected here."),
            );
        }
    }

    for (name, attr) in attributes {
        let path = child_path(parent, name);
        let value = config.get(name).unwrap_or(&NULL);
        validate_attribute(&path, name, attr, value, diags);
    }
}

fn validate_attribute(
    path: &AttributePath,
    name: &str,
    attr: &Attribute,
    value: &Json,
    diags: &mut Diagnostics,
) {
    if value.is_null() && attr.required {
        diags.add_attribute_error(
            path.clone(),
            "Missing required argument",
            format!("The argument \"{name}\" is required, but no definition was found."),
        );
        return;
    }

    if !value.is_null() && attr.is_read_only() {
        diags.add_attribute_error(
            path.clone(),
            "Invalid Configuration for Read-Only Attribute",
            "Cannot set value for this attribute as the provider has marked it as read-only. \
             Remove the configuration line setting the value.",
        );
        return;
    }

    if !value.is_null() && !is_unknown(value) {
        check_type(path, attr, value, diags);
    }

    if matches!(attr.kind, AttributeKind::String) && !attr.validators.is_empty() {
        let typed: Value<String> = match value {
            Json::Null => Value::Null,
            v if is_unknown(v) => Value::Unknown,
            Json::String(s) => Value::Known(s.clone()),
            _ => return,
        };
        for validator in &attr.validators {
            validator.validate(path, &typed, diags);
        }
    }
}

fn check_type(path: &AttributePath, attr: &Attribute, value: &Json, diags: &mut Diagnostics) {
    let mismatch = |diags: &mut Diagnostics| {
        diags.add_attribute_error(
            path.clone(),
            "Incorrect attribute value type",
            format!(
                "Inappropriate value for attribute \"{path}\": {} required, got {}.",
                attr.kind.type_name(),
                json_type(value)
            ),
        );
    };

    match (&attr.kind, value) {
        (AttributeKind::String, Json::String(_))
        | (AttributeKind::Bool, Json::Bool(_)) => {}
        (AttributeKind::Int64, v) if v.is_i64() => {}
        (AttributeKind::List { element } | AttributeKind::Set { element }, Json::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                if !is_unknown(item) && !element.matches(item) {
                    diags.add_attribute_error(
                        path.at_index(i),
                        "Incorrect attribute value type",
                        format!("Element must be a {}.", element.as_str()),
                    );
                }
            }
        }
        (AttributeKind::Map { element }, Json::Object(map)) => {
            for (key, item) in map {
                if !is_unknown(item) && !element.matches(item) {
                    diags.add_attribute_error(
                        path.at_map_key(key),
                        "Incorrect attribute value type",
                        format!("Element must be a {}.", element.as_str()),
                    );
                }
            }
        }
        (AttributeKind::SingleNested { attributes }, Json::Object(map)) => {
            validate_object(Some(path), attributes, map, diags);
        }
        (AttributeKind::ListNested { attributes }, Json::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                match item {
                    Json::Object(map) => {
                        validate_object(Some(&path.at_index(i)), attributes, map, diags);
                    }
                    _ => mismatch(&mut *diags),
                }
            }
        }
        (AttributeKind::MapNested { attributes }, Json::Object(map)) => {
            for (key, item) in map {
                match item {
                    Json::Object(inner) => {
                        validate_object(Some(&path.at_map_key(key)), attributes, inner, diags);
                    }
                    _ => mismatch(&mut *diags),
                }
            }
        }
        _ => mismatch(&mut *diags),
    }
}

fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "list",
        Json::Object(_) => "object",
    }
}
