//! OpenAPI catalog loading.
//!
//! Vault publishes its HTTP API as an OpenAPI 3 document (`vault path-help`
//! / `sys/internal/specs/openapi`). The generator only needs the `paths`
//! map, so documents are parsed into a lean [`PathCatalog`].

mod load;
mod types;

pub use load::*;
pub use types::*;
