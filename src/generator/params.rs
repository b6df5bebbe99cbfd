use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use super::naming::{identifier_prefix, terraform_type_name};
use super::registry::EndpointDescriptor;
use crate::openapi::{Parameter, PathCatalog, PathItem, Schema};
use crate::path::MOUNT_PARAMETER;
use crate::provider::ResourceKind;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Where a parameter lives in the Vault request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    #[default]
    Body,
}

/// A parameter as the templates see it, before type validation.
///
/// `oa_type` / `items_type` keep the raw OpenAPI type names so validation
/// can report exactly what was declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatableParam {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub oa_type: String,
    #[serde(default)]
    pub items_type: Option<String>,
    #[serde(default)]
    pub location: ParamLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub sensitive: bool,
}

impl TemplatableParam {
    /// A computed, response-only string parameter.
    pub fn computed_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            oa_type: "string".to_string(),
            items_type: None,
            location: ParamLocation::Body,
            required: false,
            computed: true,
            deprecated: false,
            sensitive: false,
        }
    }

    /// A computed, response-only array-of-object parameter.
    pub fn computed_objects(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            oa_type: "array".to_string(),
            items_type: Some("object".to_string()),
            ..Self::computed_string(name, description)
        }
    }

    #[must_use]
    pub fn is_path_param(&self) -> bool {
        self.location == ParamLocation::Path
    }

    fn from_path_parameter(catalog: &PathCatalog, param: &Parameter) -> Self {
        let schema = param.schema.as_ref().and_then(|s| catalog.resolve_schema(s));
        let description = param
            .description
            .clone()
            .or_else(|| schema.and_then(|s| s.description.clone()))
            .unwrap_or_default();
        Self {
            name: param.name.clone(),
            description,
            // Path parameters are strings unless declared otherwise.
            oa_type: schema
                .and_then(|s| s.schema_type.clone())
                .unwrap_or_else(|| "string".to_string()),
            items_type: schema.and_then(|s| items_type(catalog, s)),
            location: ParamLocation::Path,
            required: true,
            computed: false,
            deprecated: param.deprecated,
            sensitive: schema
                .and_then(|s| s.display_attrs.as_ref())
                .is_some_and(|d| d.sensitive),
        }
    }

    fn from_body_property(catalog: &PathCatalog, name: &str, prop: &Schema, required: bool) -> Self {
        let prop = catalog.resolve_schema(prop).unwrap_or(prop);
        Self {
            name: name.to_string(),
            description: prop.description.clone().unwrap_or_default(),
            oa_type: prop.schema_type.clone().unwrap_or_default(),
            items_type: items_type(catalog, prop),
            location: ParamLocation::Body,
            required,
            computed: false,
            deprecated: prop.deprecated,
            sensitive: prop.display_attrs.as_ref().is_some_and(|d| d.sensitive),
        }
    }
}

fn items_type(catalog: &PathCatalog, schema: &Schema) -> Option<String> {
    let items = schema.items.as_deref()?;
    let items = catalog.resolve_schema(items).unwrap_or(items);
    items
        .schema_type
        .clone()
        .or_else(|| (!items.properties.is_empty()).then(|| "object".to_string()))
}

/// Everything needed to render one endpoint's code and doc files.
#[derive(Debug, Clone)]
pub struct TemplatableEndpoint {
    pub endpoint: String,
    pub kind: ResourceKind,
    pub description: String,
    pub params: Vec<TemplatableParam>,
}

impl TemplatableEndpoint {
    /// Build from a registered descriptor and its catalog entry.
    ///
    /// Parameters come from the path item's `parameters`, then the POST
    /// JSON body's `properties` (names already claimed by a path parameter
    /// are skipped), then the descriptor's synthetic parameters. The result
    /// is sorted by name so repeated runs render identical output.
    pub fn from_path_item(
        descriptor: &EndpointDescriptor,
        catalog: &PathCatalog,
        item: &PathItem,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut params = Vec::new();
        let mut claim = |param: TemplatableParam, params: &mut Vec<TemplatableParam>| {
            if param.name == MOUNT_PARAMETER {
                warn!(
                    endpoint = %descriptor.endpoint,
                    parameter = %param.name,
                    "Parameter collides with the mount attribute, skipping"
                );
                return;
            }
            if seen.insert(param.name.clone()) {
                params.push(param);
            } else {
                debug!(
                    endpoint = %descriptor.endpoint,
                    parameter = %param.name,
                    "Duplicate parameter dropped"
                );
            }
        };

        for param in &item.parameters {
            claim(TemplatableParam::from_path_parameter(catalog, param), &mut params);
        }

        let body_schema = item
            .post
            .as_ref()
            .and_then(|op| op.request_body.as_ref())
            .and_then(|body| body.content.get(JSON_CONTENT_TYPE))
            .and_then(|media| media.schema.as_ref())
            .and_then(|schema| catalog.resolve_schema(schema));
        if let Some(schema) = body_schema {
            for (name, prop) in &schema.properties {
                let required = schema.required.iter().any(|r| r == name);
                claim(
                    TemplatableParam::from_body_property(catalog, name, prop, required),
                    &mut params,
                );
            }
        }

        for param in &descriptor.additional_parameters {
            claim(param.clone(), &mut params);
        }

        params.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            endpoint: descriptor.endpoint.clone(),
            kind: descriptor.kind,
            description: item.description.clone().unwrap_or_default(),
            params,
        }
    }

    pub fn identifier_prefix(&self) -> String {
        identifier_prefix(&self.endpoint)
    }

    pub fn terraform_type_name(&self) -> String {
        terraform_type_name(&self.endpoint)
    }
}
