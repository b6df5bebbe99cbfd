use serde_json::Value;
use std::collections::BTreeMap;

use crate::path::{ParameterSource, MOUNT_PARAMETER};

/// Configured and stored state of one resource instance.
///
/// The id is the resolved Vault path once the resource exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: Option<String>,
    values: BTreeMap<String, Value>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`, handy for configuration literals.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the resource as gone; the caller drops it from state.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// The mount path attribute.
    pub fn mount(&self) -> Option<&str> {
        self.get_str(MOUNT_PARAMETER)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Scalars become placeholder values; empty strings, nulls and composite
/// values count as unset.
impl ParameterSource for ResourceData {
    fn parameter(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_source_scalars() {
        let data = ResourceData::new()
            .with("name", "r1")
            .with("version", 3)
            .with("enabled", true)
            .with("empty", "")
            .with("list", json!(["a"]))
            .with("none", Value::Null);
        assert_eq!(data.parameter("name").as_deref(), Some("r1"));
        assert_eq!(data.parameter("version").as_deref(), Some("3"));
        assert_eq!(data.parameter("enabled").as_deref(), Some("true"));
        assert_eq!(data.parameter("empty"), None);
        assert_eq!(data.parameter("list"), None);
        assert_eq!(data.parameter("none"), None);
        assert_eq!(data.parameter("missing"), None);
    }

    #[test]
    fn test_id_lifecycle() {
        let mut data = ResourceData::new();
        assert!(data.id().is_none());
        data.set_id("/tf/role/r1");
        assert_eq!(data.id(), Some("/tf/role/r1"));
        data.clear_id();
        assert!(data.id().is_none());
    }
}
