//! Attribute paths used to point diagnostics at a configuration location.

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathStep {
    Attribute(String),
    MapKey(String),
    Index(usize),
}

/// Location of an attribute inside a resource object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributePath(Vec<PathStep>);

impl AttributePath {
    /// Path to a top-level attribute.
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![PathStep::Attribute(name.into())])
    }

    #[must_use]
    pub fn at_name(&self, name: impl Into<String>) -> Self {
        self.push(PathStep::Attribute(name.into()))
    }

    #[must_use]
    pub fn at_map_key(&self, key: impl Into<String>) -> Self {
        self.push(PathStep::MapKey(key.into()))
    }

    #[must_use]
    pub fn at_index(&self, index: usize) -> Self {
        self.push(PathStep::Index(index))
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    /// Resolve this path against a raw JSON object.
    pub fn lookup<'a>(&self, value: &'a serde_json::Value) -> Option<&'a serde_json::Value> {
        self.0.iter().try_fold(value, |current, step| match step {
            PathStep::Attribute(name) | PathStep::MapKey(name) => current.get(name.as_str()),
            PathStep::Index(i) => current.get(*i),
        })
    }

    pub fn lookup_mut<'a>(
        &self,
        value: &'a mut serde_json::Value,
    ) -> Option<&'a mut serde_json::Value> {
        self.0.iter().try_fold(value, |current, step| match step {
            PathStep::Attribute(name) | PathStep::MapKey(name) => current.get_mut(name.as_str()),
            PathStep::Index(i) => current.get_mut(*i),
        })
    }

    fn push(&self, step: PathStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{name}")?,
                PathStep::Attribute(name) => write!(f, ".{name}")?,
                PathStep::MapKey(key) => write!(f, "[\"{key}\"]")?,
                PathStep::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for AttributePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        let path = AttributePath::root("mapping_rules")
            .at_index(2)
            .at_name("headers")
            .at_map_key("X-Api");
        assert_eq!(path.to_string(), "mapping_rules[2].headers[\"X-Api\"]");
        assert_eq!(
            AttributePath::root("auth_secret").at_name("basic").to_string(),
            "auth_secret.basic"
        );
    }

    #[test]
    fn test_lookup() {
        let value = json!({"auth_secret": {"basic": "u:p"}, "rules": [{"url": "/a"}]});
        assert_eq!(
            AttributePath::root("auth_secret").at_name("basic").lookup(&value),
            Some(&json!("u:p"))
        );
        assert_eq!(
            AttributePath::root("rules").at_index(0).at_name("url").lookup(&value),
            Some(&json!("/a"))
        );
        assert!(AttributePath::root("missing").lookup(&value).is_none());
    }
}
