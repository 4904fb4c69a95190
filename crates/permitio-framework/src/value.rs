//! Tri-state attribute values.
//!
//! Every attribute in a plan, config or state is either null, unknown (to be
//! computed during apply) or a known value. [`Value`] carries that state
//! through the serde boundary: `null` maps to [`Value::Null`], the legacy
//! Terraform unknown sentinel maps to [`Value::Unknown`], and anything else is
//! decoded as `T`.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// String stored in place of a value that is not yet known.
pub const UNKNOWN_SENTINEL: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// Shared null used when an attribute is absent from an object.
pub(crate) static NULL: serde_json::Value = serde_json::Value::Null;

/// A Terraform attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<T> {
    /// Not set.
    Null,
    /// Set, but only known after apply.
    Unknown,
    /// Set and known.
    Known(T),
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> Value<T> {
    /// Wrap a known value.
    pub fn known(value: T) -> Self {
        Self::Known(value)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Borrow the known value, if any.
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Take the known value. Null and unknown both become `None`.
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Value<&T> {
        match self {
            Self::Null => Value::Null,
            Self::Unknown => Value::Unknown,
            Self::Known(v) => Value::Known(v),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Value<U> {
        match self {
            Self::Null => Value::Null,
            Self::Unknown => Value::Unknown,
            Self::Known(v) => Value::Known(f(v)),
        }
    }

    /// Keep a known value, otherwise fall back to `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Known(_) => self,
            _ => other,
        }
    }
}

impl Value<String> {
    pub fn as_str(&self) -> Option<&str> {
        self.as_known().map(String::as_str)
    }

    /// The known string, or an empty string for null and unknown.
    #[must_use]
    pub fn value_or_empty(&self) -> String {
        self.as_str().unwrap_or_default().to_string()
    }
}

impl<T> From<Option<T>> for Value<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Known(v),
            None => Self::Null,
        }
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Self::Known(value.to_string())
    }
}

impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Unknown => serializer.serialize_str(UNKNOWN_SENTINEL),
            Self::Known(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Value<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        if raw.is_null() {
            return Ok(Self::Null);
        }
        if is_unknown(&raw) {
            return Ok(Self::Unknown);
        }
        serde_json::from_value(raw)
            .map(Self::Known)
            .map_err(D::Error::custom)
    }
}

/// Whether a raw JSON value is the unknown sentinel.
#[must_use]
pub fn is_unknown(value: &serde_json::Value) -> bool {
    value.as_str() == Some(UNKNOWN_SENTINEL)
}

/// The raw JSON form of an unknown value.
#[must_use]
pub fn unknown() -> serde_json::Value {
    serde_json::Value::String(UNKNOWN_SENTINEL.to_string())
}

/// Whether any value nested in `value` is unknown.
#[must_use]
pub fn contains_unknown(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::String(_) => is_unknown(value),
        serde_json::Value::Array(items) => items.iter().any(contains_unknown),
        serde_json::Value::Object(map) => map.values().any(contains_unknown),
        _ => false,
    }
}
