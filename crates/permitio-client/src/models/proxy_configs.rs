use super::ObjectIds;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::fmt;

/// How the proxy authenticates to the upstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMechanism {
    Bearer,
    Basic,
    Headers,
}

impl AuthMechanism {
    pub const ALL: [AuthMechanism; 3] = [Self::Bearer, Self::Basic, Self::Headers];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bearer => "Bearer",
            Self::Basic => "Basic",
            Self::Headers => "Headers",
        }
    }

    /// Parse an exact mechanism name.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

impl fmt::Display for AuthMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub url: String,
    pub http_method: String,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

/// `secret` is a string for `Basic`/`Bearer` and a header map for `Headers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfigCreate {
    pub key: String,
    pub name: String,
    pub secret: Json,
    pub auth_mechanism: AuthMechanism,
    pub mapping_rules: Vec<MappingRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_mechanism: Option<AuthMechanism>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_rules: Option<Vec<MappingRule>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfigRead {
    #[serde(flatten)]
    pub ids: ObjectIds,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub secret: Json,
    pub auth_mechanism: AuthMechanism,
    #[serde(default)]
    pub mapping_rules: Vec<MappingRule>,
}
