use super::ObjectIds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionSetType {
    #[serde(rename = "userset")]
    UserSet,
    #[serde(rename = "resourceset")]
    ResourceSet,
}

impl ConditionSetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserSet => "userset",
            Self::ResourceSet => "resourceset",
        }
    }
}

impl fmt::Display for ConditionSetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSetCreate {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub set_type: ConditionSetType,
    /// Key of the resource a resource set filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub conditions: Map<String, Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionSetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Map<String, Json>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Minimal view of the resource embedded in a condition set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    #[serde(default)]
    pub id: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSetRead {
    #[serde(flatten)]
    pub ids: ObjectIds,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub set_type: ConditionSetType,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub resource: Option<ResourceRef>,
    #[serde(default)]
    pub conditions: Map<String, Json>,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user set granted a permission on a resource set.
///
/// Used as the create body, the delete body and the lookup query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRule {
    pub user_set: String,
    pub permission: String,
    pub resource_set: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRuleRead {
    #[serde(flatten)]
    pub ids: ObjectIds,
    pub user_set: String,
    pub permission: String,
    pub resource_set: String,
}
