//! # vault-provider-codegen
//!
//! Code generation and path templating for Terraform-style Vault resources.
//!
//! Vault publishes an OpenAPI document describing every endpoint of a
//! running server. This crate turns a curated set of those endpoints into
//! declarative resource and data source schemas, and ships the runtime that
//! drives those schemas against Vault.
//!
//! ## Modules
//!
//! - [`generator`] - endpoint registry and the code/doc generator
//! - [`openapi`] - lean model of Vault's OpenAPI document
//! - [`path`] - endpoint templates: resolve to a literal path and back
//! - [`provider`] - schema types and the generic lifecycle engine
//! - [`config`] - generator and Vault client settings
//! - [`logging`] - tracing subscriber setup
//! - [`cli`] - the `vault-provider-gen` binary
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use vault_provider_codegen::path::{parse_path, path_parameters};
//!
//! let values = BTreeMap::from([("name".to_string(), "payments".to_string())]);
//! let path = parse_path("my-transform", "/transform/role/{name}", &values).unwrap();
//! assert_eq!(path, "/my-transform/role/payments");
//!
//! let params = path_parameters("/transform/role/{name}", &path).unwrap();
//! assert_eq!(params["path"], "my-transform");
//! assert_eq!(params["name"], "payments");
//! ```

pub mod cli;
pub mod config;
pub mod generator;
pub mod logging;
pub mod openapi;
pub mod path;
pub mod provider;
