//! Planning a change to a single resource instance.
//!
//! The proposed state starts from the configuration, fills computed
//! attributes that the user left unset from prior state, marks them unknown
//! when the instance is changing, and then runs each attribute's plan
//! modifiers. Set attributes are compared without regard to order.

use crate::path::AttributePath;
use crate::schema::{Attribute, AttributeKind, PlanModifier, Schema};
use crate::value::{NULL, is_unknown, unknown};
use serde::Serialize;
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use tracing::debug;

type Attributes = BTreeMap<String, Attribute>;

/// What applying a plan will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    Noop,
    Create,
    Update,
    /// Delete the existing instance, then create a new one.
    Replace,
}

impl PlanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Noop => "no-op",
            Self::Create => "create",
            Self::Update => "update",
            Self::Replace => "replace",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedChange {
    pub action: PlanAction,
    pub planned_state: Json,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires_replace: Vec<AttributePath>,
}

/// Plan the transition from `prior` state (if the instance exists) to `config`.
pub fn plan_resource_change(schema: &Schema, prior: Option<&Json>, config: &Json) -> PlannedChange {
    let empty = Map::new();
    let config = config.as_object().unwrap_or(&empty);
    let prior = prior.and_then(Json::as_object);

    let Some(prior) = prior else {
        return PlannedChange {
            action: PlanAction::Create,
            planned_state: Json::Object(plan_object(&schema.attributes, None, config, None)),
            requires_replace: Vec::new(),
        };
    };

    let mut replace = Vec::new();
    let planned = plan_object(&schema.attributes, Some(prior), config, Some(&mut replace));

    if !replace.is_empty() {
        debug!(paths = ?replace, "Planned change requires replacement");
        return PlannedChange {
            action: PlanAction::Replace,
            planned_state: Json::Object(plan_object(&schema.attributes, None, config, None)),
            requires_replace: replace,
        };
    }

    let action = if objects_equal(&schema.attributes, &planned, prior) {
        PlanAction::Noop
    } else {
        PlanAction::Update
    };

    PlannedChange {
        action,
        planned_state: Json::Object(planned),
        requires_replace: replace,
    }
}

fn plan_object(
    attrs: &Attributes,
    prior: Option<&Map<String, Json>>,
    config: &Map<String, Json>,
    replace: Option<&mut Vec<AttributePath>>,
) -> Map<String, Json> {
    let mut planned = proposed_new(attrs, prior, config);
    let changed = prior.is_none_or(|p| !objects_equal(attrs, &planned, p));
    if changed {
        mark_computed_unknown(attrs, config, &mut planned);
    }
    let mut scratch = Vec::new();
    let replace = replace.unwrap_or(&mut scratch);
    apply_modifiers(None, attrs, prior, &mut planned, replace);
    planned
}

/// Config values, with prior state filling unset computed attributes.
fn proposed_new(
    attrs: &Attributes,
    prior: Option<&Map<String, Json>>,
    config: &Map<String, Json>,
) -> Map<String, Json> {
    let mut out = Map::new();
    for (name, attr) in attrs {
        let cfg = config.get(name).unwrap_or(&NULL);
        let prior_value = prior.and_then(|p| p.get(name));

        let value = if cfg.is_null() {
            if attr.computed {
                prior_value.cloned().unwrap_or(Json::Null)
            } else {
                Json::Null
            }
        } else {
            proposed_nested(attr, prior_value, cfg)
        };
        out.insert(name.clone(), value);
    }
    out
}

fn proposed_nested(attr: &Attribute, prior: Option<&Json>, cfg: &Json) -> Json {
    match (&attr.kind, cfg) {
        (AttributeKind::SingleNested { attributes }, Json::Object(inner)) => Json::Object(
            proposed_new(attributes, prior.and_then(Json::as_object), inner),
        ),
        (AttributeKind::MapNested { attributes }, Json::Object(elements)) => {
            let prior_elements = prior.and_then(Json::as_object);
            Json::Object(
                elements
                    .iter()
                    .map(|(key, element)| {
                        let prior_element = prior_elements
                            .and_then(|p| p.get(key))
                            .and_then(Json::as_object);
                        let value = match element.as_object() {
                            Some(inner) => {
                                Json::Object(proposed_new(attributes, prior_element, inner))
                            }
                            None => element.clone(),
                        };
                        (key.clone(), value)
                    })
                    .collect(),
            )
        }
        (AttributeKind::ListNested { attributes }, Json::Array(elements)) => {
            let prior_elements = prior.and_then(Json::as_array);
            Json::Array(
                elements
                    .iter()
                    .enumerate()
                    .map(|(i, element)| {
                        let prior_element = prior_elements
                            .and_then(|p| p.get(i))
                            .and_then(Json::as_object);
                        match element.as_object() {
                            Some(inner) => {
                                Json::Object(proposed_new(attributes, prior_element, inner))
                            }
                            None => element.clone(),
                        }
                    })
                    .collect(),
            )
        }
        _ => cfg.clone(),
    }
}

fn mark_computed_unknown(attrs: &Attributes, config: &Map<String, Json>, planned: &mut Map<String, Json>) {
    for (name, attr) in attrs {
        let cfg = config.get(name).unwrap_or(&NULL);
        if cfg.is_null() {
            if attr.computed {
                planned.insert(name.clone(), unknown());
            }
            continue;
        }
        let Some(slot) = planned.get_mut(name) else {
            continue;
        };
        match (&attr.kind, cfg, slot) {
            (AttributeKind::SingleNested { attributes }, Json::Object(inner), Json::Object(out)) => {
                mark_computed_unknown(attributes, inner, out);
            }
            (AttributeKind::MapNested { attributes }, Json::Object(elements), Json::Object(out)) => {
                for (key, element) in elements {
                    if let (Some(inner), Some(Json::Object(target))) =
                        (element.as_object(), out.get_mut(key))
                    {
                        mark_computed_unknown(attributes, inner, target);
                    }
                }
            }
            (AttributeKind::ListNested { attributes }, Json::Array(elements), Json::Array(out)) => {
                for (element, target) in elements.iter().zip(out.iter_mut()) {
                    if let (Some(inner), Json::Object(target)) = (element.as_object(), target) {
                        mark_computed_unknown(attributes, inner, target);
                    }
                }
            }
            _ => {}
        }
    }
}

fn apply_modifiers(
    parent: Option<&AttributePath>,
    attrs: &Attributes,
    prior: Option<&Map<String, Json>>,
    planned: &mut Map<String, Json>,
    replace: &mut Vec<AttributePath>,
) {
    for (name, attr) in attrs {
        let path = match parent {
            Some(p) => p.at_name(name),
            None => AttributePath::root(name),
        };
        let prior_value = prior.and_then(|p| p.get(name));
        let slot = planned.entry(name.clone()).or_insert(Json::Null);

        modify_nested(&path, attr, prior_value, slot, replace);

        for modifier in &attr.plan_modifiers {
            match modifier {
                PlanModifier::NormalizeEmptyStringToNull => {
                    if slot.as_str() == Some("") {
                        *slot = Json::Null;
                    }
                }
                PlanModifier::UseStateForUnknown => {
                    if let Some(state) = prior_value {
                        if is_unknown(slot) && !state.is_null() {
                            *slot = state.clone();
                        }
                    }
                }
                PlanModifier::RequiresReplace => {
                    if prior.is_some() && !values_equal(attr, slot, prior_value.unwrap_or(&NULL)) {
                        replace.push(path.clone());
                    }
                }
            }
        }
    }
}

fn modify_nested(
    path: &AttributePath,
    attr: &Attribute,
    prior: Option<&Json>,
    slot: &mut Json,
    replace: &mut Vec<AttributePath>,
) {
    match (&attr.kind, slot) {
        (AttributeKind::SingleNested { attributes }, Json::Object(out)) => {
            apply_modifiers(Some(path), attributes, prior.and_then(Json::as_object), out, replace);
        }
        (AttributeKind::MapNested { attributes }, Json::Object(elements)) => {
            let prior_elements = prior.and_then(Json::as_object);
            for (key, element) in elements.iter_mut() {
                if let Json::Object(out) = element {
                    let prior_element = prior_elements
                        .and_then(|p| p.get(key))
                        .and_then(Json::as_object);
                    apply_modifiers(Some(&path.at_map_key(key)), attributes, prior_element, out, replace);
                }
            }
        }
        (AttributeKind::ListNested { attributes }, Json::Array(elements)) => {
            let prior_elements = prior.and_then(Json::as_array);
            for (i, element) in elements.iter_mut().enumerate() {
                if let Json::Object(out) = element {
                    let prior_element = prior_elements
                        .and_then(|p| p.get(i))
                        .and_then(Json::as_object);
                    apply_modifiers(Some(&path.at_index(i)), attributes, prior_element, out, replace);
                }
            }
        }
        _ => {}
    }
}

/// Compare two objects attribute by attribute. Missing attributes equal null.
pub fn objects_equal(attrs: &Attributes, a: &Map<String, Json>, b: &Map<String, Json>) -> bool {
    attrs.iter().all(|(name, attr)| {
        values_equal(
            attr,
            a.get(name).unwrap_or(&NULL),
            b.get(name).unwrap_or(&NULL),
        )
    })
}

/// Schema-aware equality: sets ignore order, nested objects ignore attributes
/// outside the schema.
pub fn values_equal(attr: &Attribute, a: &Json, b: &Json) -> bool {
    match (&attr.kind, a, b) {
        (AttributeKind::Set { .. }, Json::Array(x), Json::Array(y)) => sets_equal(x, y),
        (AttributeKind::SingleNested { attributes }, Json::Object(x), Json::Object(y)) => {
            objects_equal(attributes, x, y)
        }
        (AttributeKind::MapNested { attributes }, Json::Object(x), Json::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(key, xv)| match (xv, y.get(key)) {
                    (Json::Object(xo), Some(Json::Object(yo))) => objects_equal(attributes, xo, yo),
                    (xv, Some(yv)) => xv == yv,
                    (_, None) => false,
                })
        }
        (AttributeKind::ListNested { attributes }, Json::Array(x), Json::Array(y)) => {
            x.len() == y.len()
                && x.iter().zip(y).all(|pair| match pair {
                    (Json::Object(xo), Json::Object(yo)) => objects_equal(attributes, xo, yo),
                    (xv, yv) => xv == yv,
                })
        }
        _ => a == b,
    }
}

fn sets_equal(a: &[Json], b: &[Json]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut x: Vec<String> = a.iter().map(Json::to_string).collect();
    let mut y: Vec<String> = b.iter().map(Json::to_string).collect();
    x.sort();
    y.sort();
    x == y
}
