use anyhow::Context;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use super::types::{OpenApiDocument, PathItem, Schema};

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Endpoint template → path item, plus the component schemas that request
/// bodies may reference.
#[derive(Debug, Clone, Default)]
pub struct PathCatalog {
    paths: BTreeMap<String, PathItem>,
    schemas: BTreeMap<String, Schema>,
}

impl PathCatalog {
    pub fn new(paths: BTreeMap<String, PathItem>) -> Self {
        Self {
            paths,
            schemas: BTreeMap::new(),
        }
    }

    pub fn from_document(document: OpenApiDocument) -> Self {
        Self {
            paths: document.paths,
            schemas: document
                .components
                .map(|c| c.schemas)
                .unwrap_or_default(),
        }
    }

    pub fn get(&self, template: &str) -> Option<&PathItem> {
        self.paths.get(template)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Follow a `#/components/schemas/...` reference, if `schema` is one.
    ///
    /// Returns `None` for dangling references.
    pub fn resolve_schema<'a>(&'a self, schema: &'a Schema) -> Option<&'a Schema> {
        match schema.reference.as_deref() {
            None => Some(schema),
            Some(reference) => reference
                .strip_prefix(SCHEMA_REF_PREFIX)
                .and_then(|name| self.schemas.get(name)),
        }
    }
}

/// Load an OpenAPI catalog from a JSON or YAML file.
///
/// The format is chosen by extension: `.yaml`/`.yml` are YAML, anything else
/// is JSON.
pub fn load_catalog(file_path: &Path) -> anyhow::Result<PathCatalog> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read OpenAPI document {:?}", file_path))?;
    let is_yaml = file_path
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);
    let document: OpenApiDocument = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML OpenAPI document {:?}", file_path))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON OpenAPI document {:?}", file_path))?
    };

    let version = document
        .info
        .as_ref()
        .map(|i| i.version.clone())
        .unwrap_or_default();
    let catalog = PathCatalog::from_document(document);
    info!(
        file = ?file_path,
        paths = catalog.len(),
        vault_version = %version,
        "Loaded OpenAPI path catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_schema_reference() {
        let document: OpenApiDocument = serde_json::from_value(json!({
            "paths": {
                "/transform/role/{name}": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/TransformWriteRoleRequest"}
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "TransformWriteRoleRequest": {
                        "type": "object",
                        "properties": {"transformations": {"type": "array", "items": {"type": "string"}}}
                    }
                }
            }
        }))
        .unwrap();
        let catalog = PathCatalog::from_document(document);
        let item = catalog.get("/transform/role/{name}").unwrap();
        let schema = item.post.as_ref().unwrap().request_body.as_ref().unwrap().content
            ["application/json"]
            .schema
            .as_ref()
            .unwrap();
        let resolved = catalog.resolve_schema(schema).unwrap();
        assert!(resolved.properties.contains_key("transformations"));

        let dangling = Schema {
            reference: Some("#/components/schemas/Missing".to_string()),
            ..Default::default()
        };
        assert!(catalog.resolve_schema(&dangling).is_none());
    }

    #[test]
    fn test_load_catalog_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("openapi.yaml");
        std::fs::write(
            &file,
            "openapi: 3.0.2\ninfo:\n  title: HashiCorp Vault API\n  version: 1.15.0\npaths:\n  /auth/jwt/config:\n    post: {}\n",
        )
        .unwrap();
        let catalog = load_catalog(&file).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("/auth/jwt/config").unwrap().post.is_some());
    }
}
