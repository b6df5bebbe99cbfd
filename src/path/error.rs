use std::fmt;

/// Errors raised while parsing, resolving or matching endpoint templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The endpoint template itself is malformed
    ///
    /// Templates must be absolute, contain at least a mount segment, and
    /// every placeholder must span a whole segment without nesting.
    InvalidTemplate {
        /// The offending template string
        template: String,
        /// What is wrong with it
        reason: String,
    },
    /// A literal Vault path does not have the structure of the template
    PathMismatch {
        /// The endpoint template that was matched against
        template: String,
        /// The literal path that failed to match
        path: String,
    },
    /// A resolved path still carries placeholders that had no value
    Unresolved {
        /// The partially resolved path
        path: String,
        /// Placeholder names that are still present, in template order
        placeholders: Vec<String>,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidTemplate { template, reason } => {
                write!(f, "invalid endpoint template '{}': {}", template, reason)
            }
            PathError::PathMismatch { template, path } => {
                write!(
                    f,
                    "path '{}' does not match endpoint template '{}'",
                    path, template
                )
            }
            PathError::Unresolved { path, placeholders } => {
                write!(
                    f,
                    "path '{}' has unresolved placeholders: {}",
                    path,
                    placeholders.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for PathError {}
