//! Registry of the Vault endpoints the generator renders.
//!
//! The built-in registry covers the `transform` secrets engine and a few
//! auth-method endpoints. A TOML file can replace it:
//!
//! ```toml
//! [[endpoint]]
//! path = "/transform/encode/{role_name}"
//! kind = "data_source"
//!
//! [[endpoint.additional_parameters]]
//! name = "encoded_value"
//! type = "string"
//! computed = true
//! description = "The result of encoding a value."
//! ```

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::params::TemplatableParam;
use crate::path::PathTemplate;
use crate::provider::ResourceKind;

/// One endpoint to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    #[serde(rename = "path")]
    pub endpoint: String,
    pub kind: ResourceKind,
    /// Parameters the OpenAPI schema does not describe, typically
    /// response-only computed fields
    #[serde(default)]
    pub additional_parameters: Vec<TemplatableParam>,
}

impl EndpointDescriptor {
    pub fn resource(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            kind: ResourceKind::Resource,
            additional_parameters: Vec::new(),
        }
    }

    pub fn data_source(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            kind: ResourceKind::DataSource,
            additional_parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_parameter(mut self, param: TemplatableParam) -> Self {
        self.additional_parameters.push(param);
        self
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "endpoint")]
    endpoints: Vec<EndpointDescriptor>,
}

/// Endpoint template → descriptor, iterated in template order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRegistry {
    entries: BTreeMap<String, EndpointDescriptor>,
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EndpointRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The endpoints shipped with the provider.
    pub fn builtin() -> Self {
        let batch_results = || {
            TemplatableParam::computed_objects(
                "batch_results",
                "The result of the batch operation, one entry per batch input item.",
            )
        };
        let descriptors = [
            EndpointDescriptor::data_source("/auth/approle/tidy/secret-id"),
            EndpointDescriptor::resource("/auth/jwt/config"),
            EndpointDescriptor::resource("/transform/alphabet/{name}"),
            EndpointDescriptor::data_source("/transform/decode/{role_name}")
                .with_parameter(TemplatableParam::computed_string(
                    "decoded_value",
                    "The result of decoding a value.",
                ))
                .with_parameter(batch_results()),
            EndpointDescriptor::data_source("/transform/encode/{role_name}")
                .with_parameter(TemplatableParam::computed_string(
                    "encoded_value",
                    "The result of encoding a value.",
                ))
                .with_parameter(batch_results()),
            EndpointDescriptor::resource("/transform/role/{name}"),
            EndpointDescriptor::resource("/transform/template/{name}"),
            EndpointDescriptor::resource("/transform/transformation/{name}"),
        ];
        let mut registry = Self::empty();
        for descriptor in descriptors {
            registry
                .entries
                .insert(descriptor.endpoint.clone(), descriptor);
        }
        registry
    }

    /// Add a descriptor.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint template is malformed or already registered.
    pub fn register(&mut self, descriptor: EndpointDescriptor) -> anyhow::Result<()> {
        PathTemplate::parse(&descriptor.endpoint)?;
        if self.entries.contains_key(&descriptor.endpoint) {
            bail!("endpoint '{}' is registered twice", descriptor.endpoint);
        }
        self.entries.insert(descriptor.endpoint.clone(), descriptor);
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let file: RegistryFile = toml::from_str(content).context("Invalid endpoint registry")?;
        let mut registry = Self::empty();
        for descriptor in file.endpoints {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read endpoint registry {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load endpoint registry {:?}", path))
    }

    pub fn get(&self, endpoint: &str) -> Option<&EndpointDescriptor> {
        self.entries.get(endpoint)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::params::ParamLocation;

    #[test]
    fn test_builtin_templates_parse() {
        let registry = EndpointRegistry::builtin();
        assert_eq!(registry.len(), 8);
        for descriptor in registry.iter() {
            assert!(PathTemplate::parse(&descriptor.endpoint).is_ok());
        }
        let encode = registry.get("/transform/encode/{role_name}").unwrap();
        assert_eq!(encode.kind, ResourceKind::DataSource);
        assert!(encode
            .additional_parameters
            .iter()
            .any(|p| p.name == "encoded_value" && p.computed));
    }

    #[test]
    fn test_iteration_is_sorted() {
        let names: Vec<_> = EndpointRegistry::builtin()
            .iter()
            .map(|d| d.endpoint.clone())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_from_toml() {
        let registry = EndpointRegistry::from_toml_str(
            r#"
[[endpoint]]
path = "/transform/role/{name}"
kind = "resource"

[[endpoint]]
path = "/transform/encode/{role_name}"
kind = "data_source"

[[endpoint.additional_parameters]]
name = "encoded_value"
type = "string"
computed = true
"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
        let param = &registry
            .get("/transform/encode/{role_name}")
            .unwrap()
            .additional_parameters[0];
        assert_eq!(param.oa_type, "string");
        assert_eq!(param.location, ParamLocation::Body);
        assert!(param.computed);
    }

    #[test]
    fn test_from_toml_rejects_duplicates_and_bad_templates() {
        let dup = r#"
[[endpoint]]
path = "/transform/role/{name}"
kind = "resource"

[[endpoint]]
path = "/transform/role/{name}"
kind = "data_source"
"#;
        assert!(EndpointRegistry::from_toml_str(dup).is_err());

        let bad = r#"
[[endpoint]]
path = "transform/role"
kind = "resource"
"#;
        assert!(EndpointRegistry::from_toml_str(bad).is_err());
    }
}
