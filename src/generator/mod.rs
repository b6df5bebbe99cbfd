//! # Generator Module
//!
//! Offline, developer-invoked generation of resource and data-source
//! modules (plus starter documentation) from Vault's OpenAPI description.
//!
//! ## Flow
//!
//! ```text
//! OpenAPI catalog ─┐
//!                  ├─ TemplatableEndpoint::from_path_item ─ validate ─ render ─ write
//! EndpointRegistry ┘
//! ```
//!
//! 1. **Registry** - [`EndpointRegistry`] lists the endpoint templates to
//!    generate, each as a resource or data source, with any synthetic
//!    parameters the OpenAPI schema does not describe.
//! 2. **Extraction** - path parameters then POST body properties are
//!    collected, deduplicated (path parameters win) and sorted by name.
//! 3. **Validation** - only string, boolean, integer and arrays of string or
//!    object are supported; anything else skips the endpoint with a warning.
//! 4. **Rendering** - Askama templates under `templates/` produce the Rust
//!    module and the Markdown doc.
//!
//! ## Output Layout
//!
//! ```text
//! <home>/
//! ├── generated/
//! │   ├── mod.rs
//! │   ├── resources/transform/role/name.rs
//! │   └── datasources/transform/encode/role_name.rs
//! └── website/docs/
//!     ├── r/transform_role_name.html.md
//!     └── d/transform_encode_role_name.html.md
//! ```
//!
//! Code files are always regenerated; documentation is only written when
//! missing so hand edits survive.
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use vault_provider_codegen::config::GeneratorConfig;
//! use vault_provider_codegen::generator::{EndpointRegistry, Generator};
//! use vault_provider_codegen::openapi::load_catalog;
//!
//! let catalog = load_catalog("testdata/openapi.json".as_ref())?;
//! let config = GeneratorConfig::from_env();
//! let registry = EndpointRegistry::builtin();
//! let report = Generator::new(&config, &registry).run(&catalog)?;
//! println!("generated {} files", report.code_files.len());
//! ```

mod format;
mod generate;
mod naming;
mod params;
mod registry;
mod templates;
mod validate;

pub use format::format_files;
pub use generate::{run, GenerationReport, Generator, SkippedEndpoint};
pub use naming::*;
pub use params::{ParamLocation, TemplatableEndpoint, TemplatableParam};
pub use registry::{EndpointDescriptor, EndpointRegistry};
pub use templates::{render_code, render_doc, write_code_file, write_doc_file, write_mod_rs};
pub use validate::ValidationError;
