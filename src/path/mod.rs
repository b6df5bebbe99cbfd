//! # Path Module
//!
//! Runtime bridge between a resource's configured attributes and the literal
//! hierarchical path Vault expects.
//!
//! Every endpoint is described by a template such as `/transform/role/{name}`.
//! Its first segment is the engine type and is replaced by the user's mount
//! path; auth-method templates (`/auth/jwt/config`) keep the `auth` prefix and
//! replace the segment after it.
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use vault_provider_codegen::path::PathTemplate;
//!
//! let template = PathTemplate::parse("/transform/role/{name}").unwrap();
//! let values = BTreeMap::from([("name".to_string(), "payments".to_string())]);
//! let path = template.resolve("my-transform", &values);
//! assert_eq!(path, "/my-transform/role/payments");
//!
//! let params = template.extract(&path).unwrap();
//! assert_eq!(params["path"], "my-transform");
//! assert_eq!(params["name"], "payments");
//! ```

mod error;
mod template;

pub use error::PathError;
pub use template::{ParameterSource, PathTemplate, Segment, MOUNT_PARAMETER};

use std::collections::BTreeMap;

/// Resolve `endpoint` against a mount path and current values.
///
/// Placeholders without a value are left as `{name}`.
///
/// # Errors
///
/// Returns [`PathError::InvalidTemplate`] if `endpoint` cannot be parsed.
pub fn parse_path(
    mount: &str,
    endpoint: &str,
    values: &impl ParameterSource,
) -> Result<String, PathError> {
    Ok(PathTemplate::parse(endpoint)?.resolve(mount, values))
}

/// Extract the mount path and placeholder values of `endpoint` from `path`.
///
/// # Errors
///
/// Returns [`PathError::InvalidTemplate`] for a malformed template and
/// [`PathError::PathMismatch`] when `path` does not fit it.
pub fn path_parameters(endpoint: &str, path: &str) -> Result<BTreeMap<String, String>, PathError> {
    PathTemplate::parse(endpoint)?.extract(path)
}
