//! Schema definitions for resources, data sources and the provider block.

use crate::diag::Diagnostics;
use crate::path::AttributePath;
use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Primitive element type of a collection attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    String,
    Int64,
    Bool,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "number",
            Self::Bool => "bool",
        }
    }

    pub(crate) fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Int64 => value.is_i64(),
            Self::Bool => value.is_boolean(),
        }
    }
}

/// Shape of an attribute.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Int64,
    Bool,
    List { element: ElementType },
    /// Unordered collection. Plans compare sets without regard to order.
    Set { element: ElementType },
    Map { element: ElementType },
    SingleNested { attributes: BTreeMap<String, Attribute> },
    ListNested { attributes: BTreeMap<String, Attribute> },
    MapNested { attributes: BTreeMap<String, Attribute> },
}

impl AttributeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "number",
            Self::Bool => "bool",
            Self::List { .. } | Self::ListNested { .. } => "list",
            Self::Set { .. } => "set",
            Self::Map { .. } | Self::MapNested { .. } => "map",
            Self::SingleNested { .. } => "object",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanModifier {
    /// Keep the prior state value when the planned value would be unknown.
    UseStateForUnknown,
    /// A change to this attribute destroys and recreates the instance.
    RequiresReplace,
    /// Plan an empty string as null.
    NormalizeEmptyStringToNull,
}

impl PlanModifier {
    pub fn description(&self) -> &'static str {
        match self {
            Self::UseStateForUnknown => {
                "Once set, the value of this attribute in state will not change."
            }
            Self::RequiresReplace => {
                "If the value of this attribute changes, Terraform will destroy and recreate the resource."
            }
            Self::NormalizeEmptyStringToNull => {
                "Normalizes empty strings to null for consistency with API behavior"
            }
        }
    }
}

/// Validation hook for string attributes.
///
/// Called for null, unknown and known values alike; implementations decide
/// which states are acceptable.
pub trait StringValidator: fmt::Debug + Send + Sync {
    fn description(&self) -> String;

    fn validate(&self, path: &AttributePath, value: &Value<String>, diags: &mut Diagnostics);
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn describe_validators<S: serde::Serializer>(
    validators: &[Arc<dyn StringValidator>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(validators.iter().map(|v| v.description()))
}

/// A single schema attribute.
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    #[serde(flatten)]
    pub kind: AttributeKind,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub computed: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plan_modifiers: Vec<PlanModifier>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "describe_validators"
    )]
    pub validators: Vec<Arc<dyn StringValidator>>,
}

impl Attribute {
    fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            description: None,
            plan_modifiers: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::new(AttributeKind::String)
    }

    pub fn int64() -> Self {
        Self::new(AttributeKind::Int64)
    }

    pub fn bool() -> Self {
        Self::new(AttributeKind::Bool)
    }

    pub fn set(element: ElementType) -> Self {
        Self::new(AttributeKind::Set { element })
    }

    pub fn list(element: ElementType) -> Self {
        Self::new(AttributeKind::List { element })
    }

    pub fn map(element: ElementType) -> Self {
        Self::new(AttributeKind::Map { element })
    }

    pub fn single_nested(attributes: BTreeMap<String, Attribute>) -> Self {
        Self::new(AttributeKind::SingleNested { attributes })
    }

    pub fn list_nested(attributes: BTreeMap<String, Attribute>) -> Self {
        Self::new(AttributeKind::ListNested { attributes })
    }

    pub fn map_nested(attributes: BTreeMap<String, Attribute>) -> Self {
        Self::new(AttributeKind::MapNested { attributes })
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_plan_modifier(mut self, modifier: PlanModifier) -> Self {
        self.plan_modifiers.push(modifier);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: impl StringValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Computed and never user-settable.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    #[must_use]
    pub fn has_plan_modifier(&self, modifier: PlanModifier) -> bool {
        self.plan_modifiers.contains(&modifier)
    }

    pub fn nested_attributes(&self) -> Option<&BTreeMap<String, Attribute>> {
        match &self.kind {
            AttributeKind::SingleNested { attributes }
            | AttributeKind::ListNested { attributes }
            | AttributeKind::MapNested { attributes } => Some(attributes),
            _ => None,
        }
    }
}

/// Schema of a resource, data source or provider block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    #[must_use]
    pub fn new(attributes: BTreeMap<String, Attribute>) -> Self {
        Self {
            description: None,
            attributes,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    #[must_use]
    pub fn without_attribute(mut self, name: &str) -> Self {
        self.attributes.remove(name);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Paths of every attribute marked sensitive, including nested ones.
    pub fn sensitive_paths(&self) -> Vec<AttributePath> {
        let mut out = Vec::new();
        for (name, attr) in &self.attributes {
            collect_sensitive(AttributePath::root(name), attr, &mut out);
        }
        out
    }
}

/// Placeholder shown instead of a sensitive value.
pub const REDACTED: &str = "(sensitive value)";

impl Schema {
    /// Copy of `value` with every set sensitive attribute replaced by
    /// [`REDACTED`]. Null and unknown values are left as they are.
    #[must_use]
    pub fn redact(&self, value: &serde_json::Value) -> serde_json::Value {
        let mut out = value.clone();
        for path in self.sensitive_paths() {
            if let Some(slot) = path.lookup_mut(&mut out) {
                if !slot.is_null() && !crate::value::is_unknown(slot) {
                    *slot = serde_json::Value::String(REDACTED.to_string());
                }
            }
        }
        out
    }
}

fn collect_sensitive(path: AttributePath, attr: &Attribute, out: &mut Vec<AttributePath>) {
    if attr.sensitive {
        out.push(path.clone());
    }
    if let AttributeKind::SingleNested { attributes } = &attr.kind {
        for (name, child) in attributes {
            collect_sensitive(path.at_name(name), child, out);
        }
    }
}

/// Build an attribute map from `(name, attribute)` pairs.
pub fn attributes<const N: usize>(pairs: [(&str, Attribute); N]) -> BTreeMap<String, Attribute> {
    pairs
        .into_iter()
        .map(|(name, attr)| (name.to_string(), attr))
        .collect()
}
