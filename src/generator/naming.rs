use std::path::PathBuf;

use crate::provider::ResourceKind;

const KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn",
];

/// Remove every `{` and `}`; unmatched braces are dropped too.
///
/// ```rust
/// use vault_provider_codegen::generator::strip_curly_braces;
///
/// assert_eq!(strip_curly_braces("{{name}}"), "name");
/// ```
pub fn strip_curly_braces(s: &str) -> String {
    s.replace(['{', '}'], "")
}

/// Normalize a template segment into a lower camelCase identifier.
///
/// Braces are stripped and the input is case-folded before underscores are
/// removed, so `{ROLE_NAME}` and `{role_name}` both become `roleName`.
pub fn format_identifier(s: &str) -> String {
    let folded = strip_curly_braces(s).to_lowercase();
    let mut parts = folded.split('_');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Convert camelCase or kebab-case to snake_case.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for ch in s.chars() {
        if ch.is_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch == '-' || ch == ' ' || ch == '.' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
        } else {
            result.push(ch);
        }
    }
    result
}

/// Replace characters that are invalid in a Rust identifier and guard
/// against leading digits.
pub fn sanitize_identifier(name: &str) -> String {
    let mut s: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if s.is_empty() {
        s.push('_');
    }
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    s
}

/// Module name for a file stem, raw-escaped when it is a keyword.
pub fn module_name(stem: &str) -> String {
    let ident = sanitize_identifier(&to_snake_case(stem));
    if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}

/// snake_case prefix distinguishing symbols of sibling generated files.
///
/// Derived from the template's last segment:
/// `/transform/encode/{role_name}` → `role_name`,
/// `/auth/approle/tidy/secret-id` → `secret_id`.
pub fn identifier_prefix(template: &str) -> String {
    let last = template.rsplit('/').next().unwrap_or_default();
    sanitize_identifier(&to_snake_case(&format_identifier(last)))
}

/// Relative path of the generated code file.
///
/// `/transform/role/{name}` → `resources/transform/role/name.rs`.
pub fn code_file_path(kind: ResourceKind, template: &str) -> PathBuf {
    let mut path = PathBuf::from(kind.code_dir());
    let stripped = strip_curly_braces(template);
    let mut segments = stripped.split('/').filter(|s| !s.is_empty()).peekable();
    while let Some(segment) = segments.next() {
        let file = sanitize_identifier(&to_snake_case(segment));
        if segments.peek().is_none() {
            path.push(format!("{file}.rs"));
        } else {
            path.push(file);
        }
    }
    path
}

/// Relative path of the starter doc.
///
/// `/transform/role/{name}` → `r/transform_role_name.html.md`.
pub fn doc_file_path(kind: ResourceKind, template: &str) -> PathBuf {
    let stripped = strip_curly_braces(template);
    let name = stripped.trim_start_matches('/').replace('/', "_");
    PathBuf::from(kind.doc_dir()).join(format!("{name}.html.md"))
}

/// Terraform type name, e.g. `vault_transform_role_name`.
pub fn terraform_type_name(template: &str) -> String {
    let stripped = strip_curly_braces(template);
    let name = stripped.trim_start_matches('/').replace(['/', '-'], "_");
    format!("vault_{name}")
}
