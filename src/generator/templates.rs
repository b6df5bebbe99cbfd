use askama::Template;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::naming::identifier_prefix;
use super::params::{TemplatableEndpoint, TemplatableParam};
use crate::provider::{AttributeType, ResourceKind};

/// One `.with_attribute(...)` line of a generated schema constructor
#[derive(Debug, Clone)]
pub struct AttributeView {
    pub name: String,
    /// e.g. `AttributeType::List(ElementType::String)`
    pub type_expr: String,
    /// Rust string literal, quotes included
    pub description_literal: String,
    /// Chained builder calls, e.g. `.required().in_path()`
    pub modifiers: String,
}

/// Template data for a generated resource module
#[derive(Template)]
#[template(path = "resource.rs.txt", escape = "none")]
pub struct ResourceTemplateData {
    pub type_name: String,
    pub endpoint: String,
    pub doc_lines: Vec<String>,
    pub use_line: String,
    pub const_name: String,
    pub fn_name: String,
    pub description_literal: String,
    pub attributes: Vec<AttributeView>,
}

/// Template data for a generated data source module
#[derive(Template)]
#[template(path = "data_source.rs.txt", escape = "none")]
pub struct DataSourceTemplateData {
    pub type_name: String,
    pub endpoint: String,
    pub doc_lines: Vec<String>,
    pub use_line: String,
    pub const_name: String,
    pub fn_name: String,
    pub description_literal: String,
    pub attributes: Vec<AttributeView>,
}

/// Template data for a starter documentation page
#[derive(Template)]
#[template(path = "doc.md.txt", escape = "none")]
pub struct DocTemplateData {
    pub type_name: String,
    pub kind_label: String,
    pub sidebar: String,
    pub endpoint: String,
    pub description: String,
    pub block_keyword: String,
    pub example_lines: Vec<String>,
    pub arguments: Vec<String>,
    pub attributes: Vec<String>,
}

/// Template data for a generated `mod.rs`
#[derive(Template)]
#[template(path = "mod.rs.txt", escape = "none")]
pub struct ModRsTemplateData {
    pub modules: Vec<String>,
}

fn modifiers(param: &TemplatableParam) -> String {
    let mut out = String::new();
    if param.is_path_param() {
        out.push_str(".required().in_path()");
    } else if param.required && !param.computed {
        out.push_str(".required()");
    }
    if param.computed {
        out.push_str(".computed()");
    }
    if param.sensitive {
        out.push_str(".sensitive()");
    }
    if param.deprecated {
        out.push_str(".deprecated()");
    }
    out
}

fn doc_lines(description: &str) -> Vec<String> {
    if description.trim().is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new()];
    lines.extend(description.trim().lines().map(|l| l.trim_end().to_string()));
    lines
}

fn ensure_trailing_newline(mut rendered: String) -> String {
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}

/// Render the Rust module for one endpoint.
///
/// # Errors
///
/// Fails when a parameter type is unsupported or the template fails to
/// render.
pub fn render_code(endpoint: &TemplatableEndpoint) -> anyhow::Result<String> {
    let mut attributes = Vec::with_capacity(endpoint.params.len());
    let mut uses_lists = false;
    for param in &endpoint.params {
        let ty = param.attribute_type()?;
        uses_lists |= matches!(ty, AttributeType::List(_));
        attributes.push(AttributeView {
            name: param.name.clone(),
            type_expr: ty.rust_expr().to_string(),
            description_literal: format!("{:?}", param.description),
            modifiers: modifiers(param),
        });
    }

    let use_line = if uses_lists {
        "use vault_provider_codegen::provider::{Attribute, AttributeType, ElementType, ResourceSchema};"
    } else {
        "use vault_provider_codegen::provider::{Attribute, AttributeType, ResourceSchema};"
    }
    .to_string();

    let prefix = identifier_prefix(&endpoint.endpoint);
    let type_name = endpoint.terraform_type_name();
    let const_name = format!("{}_ENDPOINT", prefix.to_uppercase());
    let fn_name = format!("{}_{}", prefix, endpoint.kind.fn_suffix());
    let description_literal = format!("{:?}", endpoint.description.trim());
    let doc_lines = doc_lines(&endpoint.description);

    let rendered = match endpoint.kind {
        ResourceKind::Resource => ResourceTemplateData {
            type_name,
            endpoint: endpoint.endpoint.clone(),
            doc_lines,
            use_line,
            const_name,
            fn_name,
            description_literal,
            attributes,
        }
        .render()?,
        ResourceKind::DataSource => DataSourceTemplateData {
            type_name,
            endpoint: endpoint.endpoint.clone(),
            doc_lines,
            use_line,
            const_name,
            fn_name,
            description_literal,
            attributes,
        }
        .render()?,
    };
    Ok(ensure_trailing_newline(rendered))
}

fn argument_line(param: &TemplatableParam, kind: ResourceKind) -> String {
    let requirement = if param.required { "Required" } else { "Optional" };
    let mut line = format!("* `{}` - ({}) {}", param.name, requirement, param.description.trim());
    if param.is_path_param() && kind == ResourceKind::Resource {
        line.push_str(" Changing this forces a new resource.");
    }
    if param.sensitive {
        line.push_str(" This value is sensitive and will not be displayed in plan output.");
    }
    if param.deprecated {
        line.push_str(" **Deprecated**.");
    }
    line
}

/// Render the starter documentation page for one endpoint.
///
/// # Errors
///
/// Fails when the template fails to render.
pub fn render_doc(endpoint: &TemplatableEndpoint) -> anyhow::Result<String> {
    let type_name = endpoint.terraform_type_name();
    let mut arguments = vec![format!(
        "* `path` - (Required) Path to where the back-end is mounted within Vault.{}",
        if endpoint.kind == ResourceKind::Resource {
            " Changing this forces a new resource."
        } else {
            ""
        }
    )];
    let mut attributes = Vec::new();
    let mut example_lines = Vec::new();
    for param in &endpoint.params {
        if param.computed {
            attributes.push(format!("* `{}` - {}", param.name, param.description.trim()));
            continue;
        }
        if param.required {
            example_lines.push(format!("{} = \"example\"", param.name));
        }
        arguments.push(argument_line(param, endpoint.kind));
    }

    let description = if endpoint.description.trim().is_empty() {
        format!("Interacts with the Vault endpoint `{}`.", endpoint.endpoint)
    } else {
        endpoint.description.trim().to_string()
    };

    let rendered = DocTemplateData {
        sidebar: type_name.trim_start_matches("vault_").replace('_', "-"),
        type_name,
        kind_label: endpoint.kind.to_string(),
        endpoint: endpoint.endpoint.clone(),
        description,
        block_keyword: match endpoint.kind {
            ResourceKind::Resource => "resource".to_string(),
            ResourceKind::DataSource => "data".to_string(),
        },
        example_lines,
        arguments,
        attributes,
    }
    .render()?;
    Ok(ensure_trailing_newline(rendered))
}

/// Write a generated code file, always replacing the previous version.
pub fn write_code_file(path: &Path, endpoint: &TemplatableEndpoint) -> anyhow::Result<()> {
    let rendered = render_code(endpoint)?;
    fs::write(path, rendered)?;
    info!(file = ?path, endpoint = %endpoint.endpoint, "Generated code file");
    Ok(())
}

/// Write a starter doc unless one already exists.
///
/// Returns `false` when an existing doc was left untouched.
pub fn write_doc_file(path: &Path, endpoint: &TemplatableEndpoint) -> anyhow::Result<bool> {
    if path.exists() {
        debug!(file = ?path, "Keeping existing documentation");
        return Ok(false);
    }
    let rendered = render_doc(endpoint)?;
    fs::write(path, rendered)?;
    info!(file = ?path, endpoint = %endpoint.endpoint, "Generated starter documentation");
    Ok(true)
}

/// Write a `mod.rs` declaring `modules` in the given order.
pub fn write_mod_rs(dir: &Path, modules: &[String]) -> anyhow::Result<()> {
    let rendered = ModRsTemplateData {
        modules: modules.to_vec(),
    }
    .render()?;
    let path = dir.join("mod.rs");
    fs::write(&path, ensure_trailing_newline(rendered))?;
    debug!(file = ?path, modules = modules.len(), "Generated mod.rs");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::params::ParamLocation;

    fn param(name: &str, oa_type: &str) -> TemplatableParam {
        TemplatableParam {
            name: name.to_string(),
            description: format!("The {name}."),
            oa_type: oa_type.to_string(),
            items_type: None,
            location: ParamLocation::Body,
            required: false,
            computed: false,
            deprecated: false,
            sensitive: false,
        }
    }

    fn role_endpoint() -> TemplatableEndpoint {
        let mut name = param("name", "string");
        name.location = ParamLocation::Path;
        name.required = true;
        let mut transformations = param("transformations", "array");
        transformations.items_type = Some("string".to_string());
        TemplatableEndpoint {
            endpoint: "/transform/role/{name}".to_string(),
            kind: ResourceKind::Resource,
            description: "Manage roles.".to_string(),
            params: vec![name, transformations],
        }
    }

    #[test]
    fn test_render_code_resource() {
        let code = render_code(&role_endpoint()).unwrap();
        assert!(code.starts_with("// Code generated by vault-provider-gen. DO NOT EDIT."));
        assert!(code.contains("pub const NAME_ENDPOINT: &str = \"/transform/role/{name}\";"));
        assert!(code.contains("pub fn name_resource() -> ResourceSchema {"));
        assert!(code.contains("ResourceSchema::resource(NAME_ENDPOINT)"));
        assert!(code.contains("ElementType"));
        assert!(code.contains(
            ".with_attribute(Attribute::new(\"name\", AttributeType::String).with_description(\"The name.\").required().in_path())"
        ));
        assert!(code.contains("AttributeType::List(ElementType::String)"));
        assert!(code.ends_with("}\n"));
    }

    #[test]
    fn test_render_code_rejects_unsupported_type() {
        let mut endpoint = role_endpoint();
        endpoint.params.push(param("ratio", "number"));
        assert!(render_code(&endpoint).is_err());
    }

    #[test]
    fn test_render_doc_sections() {
        let mut endpoint = role_endpoint();
        endpoint
            .params
            .push(TemplatableParam::computed_string("token", "Issued token."));
        let doc = render_doc(&endpoint).unwrap();
        assert!(doc.contains("page_title: \"Vault: vault_transform_role_name resource\""));
        assert!(doc.contains("resource \"vault_transform_role_name\" \"example\" {"));
        assert!(doc.contains("  name = \"example\""));
        assert!(doc.contains(
            "* `name` - (Required) The name. Changing this forces a new resource."
        ));
        assert!(doc.contains("* `transformations` - (Optional) The transformations."));
        assert!(doc.contains("* `token` - Issued token."));
    }

    #[test]
    fn test_description_literal_escapes_quotes() {
        let mut endpoint = role_endpoint();
        endpoint.params[1].description = "A \"quoted\" value.".to_string();
        let code = render_code(&endpoint).unwrap();
        assert!(code.contains(r#"with_description("A \"quoted\" value.")"#));
    }
}
