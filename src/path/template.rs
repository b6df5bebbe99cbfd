use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;
use tracing::debug;

use super::error::PathError;

/// Key under which [`PathTemplate::extract`] reports the mount path.
pub const MOUNT_PARAMETER: &str = "path";

/// Leading segment of Vault auth-method endpoints (`/auth/<mount>/...`).
const AUTH_SEGMENT: &str = "auth";

/// A whole-segment `{name}` placeholder; nested or partial braces are rejected.
static PLACEHOLDER_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{([^{}/]+)\}$").expect("placeholder regex should be valid"));

/// A single segment of an endpoint template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Fixed text, e.g. `role`
    Literal(String),
    /// A `{name}` placeholder, stored without braces
    Placeholder(String),
}

/// Supplies the current value of a placeholder by name.
///
/// Implemented for plain string maps and for
/// [`ResourceData`](crate::provider::ResourceData), so the same template can
/// be resolved from CLI arguments or from a resource's configured state.
pub trait ParameterSource {
    /// Current value for `name`, or `None` when it is not (yet) known
    fn parameter(&self, name: &str) -> Option<String>;
}

/// Empty strings count as unset so a resolved path never has an empty segment.
impl<S: BuildHasher> ParameterSource for HashMap<String, String, S> {
    fn parameter(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

impl ParameterSource for BTreeMap<String, String> {
    fn parameter(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

/// A parsed Vault endpoint template such as `/transform/role/{name}`.
///
/// The first segment (the second for `/auth/...` templates) names the engine
/// type and is replaced by the caller's mount path on [`resolve`]. All other
/// `{placeholder}` segments are filled from a [`ParameterSource`].
///
/// [`extract`] is the inverse: it turns the template into an anchored regex
/// with one greedy `(.+)` group per placeholder plus one for the mount.
///
/// # Limitation
///
/// Greedy groups cannot partition ambiguous input. When a placeholder value
/// contains `/` and the template has several placeholders separated only by
/// literals, `extract` returns a plausible split that may not be the one
/// `resolve` produced. Values containing `/` are only round-trip safe for the
/// mount path and the final placeholder.
///
/// [`resolve`]: PathTemplate::resolve
/// [`extract`]: PathTemplate::extract
#[derive(Debug, Clone)]
pub struct PathTemplate {
    raw: String,
    auth: bool,
    mount: String,
    segments: Vec<Segment>,
    matcher: Regex,
    capture_names: Vec<String>,
}

impl PathTemplate {
    /// Parse an endpoint template.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidTemplate`] when the template is not
    /// absolute, has empty segments, lacks a mount segment, or contains a
    /// brace that does not delimit a whole segment. A placeholder may appear
    /// only once and may not be named [`MOUNT_PARAMETER`], which
    /// [`extract`](Self::extract) reserves for the mount path.
    pub fn parse(template: &str) -> Result<Self, PathError> {
        let invalid = |reason: &str| PathError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let rest = template
            .strip_prefix('/')
            .ok_or_else(|| invalid("template must start with '/'"))?;
        let mut parts: Vec<&str> = rest.split('/').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("empty path segment"));
        }

        let auth = parts.first() == Some(&AUTH_SEGMENT);
        if auth {
            parts.remove(0);
        }
        let Some((mount, tail)) = parts.split_first() else {
            return Err(invalid("missing mount segment"));
        };

        let segments = tail
            .iter()
            .map(|part| parse_segment(part).ok_or_else(|| invalid("placeholder must span a whole segment")))
            .collect::<Result<Vec<_>, _>>()?;
        if parse_segment(mount).is_none() {
            return Err(invalid("placeholder must span a whole segment"));
        }

        let mut seen = HashSet::new();
        for segment in &segments {
            if let Segment::Placeholder(name) = segment {
                if name == MOUNT_PARAMETER {
                    return Err(invalid("placeholder name 'path' is reserved for the mount"));
                }
                if !seen.insert(name.as_str()) {
                    return Err(invalid("placeholder appears more than once"));
                }
            }
        }

        let mut pattern = String::with_capacity(template.len() + 16);
        pattern.push('^');
        if auth {
            pattern.push('/');
            pattern.push_str(AUTH_SEGMENT);
        }
        pattern.push_str("/(.+)");
        let mut capture_names = Vec::with_capacity(segments.len() + 1);
        capture_names.push(MOUNT_PARAMETER.to_string());
        for segment in &segments {
            pattern.push('/');
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Placeholder(name) => {
                    pattern.push_str("(.+)");
                    capture_names.push(name.clone());
                }
            }
        }
        pattern.push('$');

        let matcher = Regex::new(&pattern).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            raw: template.to_string(),
            auth,
            mount: (*mount).to_string(),
            segments,
            matcher,
            capture_names,
        })
    }

    /// The template as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this is an auth-method endpoint (`/auth/<mount>/...`).
    #[must_use]
    pub fn is_auth(&self) -> bool {
        self.auth
    }

    /// The engine-type segment the mount path replaces (`transform`, `jwt`).
    #[must_use]
    pub fn mount_segment(&self) -> &str {
        &self.mount
    }

    /// Segments following the mount segment.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute the mount path and any known placeholder values.
    ///
    /// Placeholders with no value are left in place: some are only known
    /// after creation. An empty mount is left as `{path}` the same way. Use
    /// [`resolve_complete`](Self::resolve_complete) before issuing an API
    /// call.
    pub fn resolve(&self, mount: &str, values: &impl ParameterSource) -> String {
        self.resolve_inner(mount, values).0
    }

    /// Like [`resolve`](Self::resolve) but fails if any placeholder is left.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Unresolved`] naming every missing placeholder,
    /// including [`MOUNT_PARAMETER`] when the mount is empty.
    pub fn resolve_complete(
        &self,
        mount: &str,
        values: &impl ParameterSource,
    ) -> Result<String, PathError> {
        let (path, missing) = self.resolve_inner(mount, values);
        if missing.is_empty() {
            Ok(path)
        } else {
            Err(PathError::Unresolved {
                path,
                placeholders: missing,
            })
        }
    }

    fn resolve_inner(&self, mount: &str, values: &impl ParameterSource) -> (String, Vec<String>) {
        let mount = self.normalize_mount(mount);
        let mut path = String::with_capacity(self.raw.len() + mount.len());
        let mut missing = Vec::new();

        if self.auth {
            path.push('/');
            path.push_str(AUTH_SEGMENT);
        }
        path.push('/');
        if mount.is_empty() {
            path.push('{');
            path.push_str(MOUNT_PARAMETER);
            path.push('}');
            missing.push(MOUNT_PARAMETER.to_string());
        } else {
            path.push_str(mount);
        }

        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Placeholder(name) => match values.parameter(name) {
                    Some(value) => path.push_str(&value),
                    None => {
                        path.push('{');
                        path.push_str(name);
                        path.push('}');
                        missing.push(name.clone());
                    }
                },
            }
        }

        debug!(
            template = %self.raw,
            resolved = %path,
            missing = ?missing,
            "Resolved endpoint template"
        );
        (path, missing)
    }

    /// Trim slashes and drop one leading `auth/` on auth templates so the
    /// prefix is emitted once. May return an empty string.
    fn normalize_mount<'a>(&self, mount: &'a str) -> &'a str {
        let mount = mount.trim_matches('/');
        if self.auth {
            if let Some(stripped) = mount.strip_prefix("auth/") {
                return stripped.trim_start_matches('/');
            }
        }
        mount
    }

    /// Recover the mount path and placeholder values from a literal path.
    ///
    /// The mount is reported under [`MOUNT_PARAMETER`]. A missing leading
    /// `/` on `path` is tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::PathMismatch`] when `path` does not have the
    /// template's structure. No partial result is ever returned.
    pub fn extract(&self, path: &str) -> Result<BTreeMap<String, String>, PathError> {
        let mismatch = || PathError::PathMismatch {
            template: self.raw.clone(),
            path: path.to_string(),
        };

        let normalized;
        let candidate = if path.starts_with('/') {
            path
        } else {
            normalized = format!("/{path}");
            normalized.as_str()
        };

        let captures = self.matcher.captures(candidate).ok_or_else(mismatch)?;
        let mut params = BTreeMap::new();
        for (index, name) in self.capture_names.iter().enumerate() {
            let value = captures.get(index + 1).ok_or_else(mismatch)?;
            params.insert(name.clone(), value.as_str().to_string());
        }

        debug!(
            template = %self.raw,
            path = %path,
            params = ?params,
            "Extracted path parameters"
        );
        Ok(params)
    }
}

fn parse_segment(part: &str) -> Option<Segment> {
    if !part.contains(['{', '}']) {
        return Some(Segment::Literal(part.to_string()));
    }
    let captures = PLACEHOLDER_SEGMENT.captures(part)?;
    Some(Segment::Placeholder(captures[1].to_string()))
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for PathTemplate {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for PathTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for PathTemplate {}
