use super::ObjectIds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationCreate {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subject_resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRead {
    #[serde(flatten)]
    pub ids: ObjectIds,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub subject_resource: String,
    pub subject_resource_id: String,
    pub object_resource: String,
    pub object_resource_id: String,
}

/// Implicit grant: holders of `role` on `on_resource` receive the target
/// role through `linked_by_relation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRoleRule {
    pub role: String,
    pub on_resource: String,
    pub linked_by_relation: String,
}
