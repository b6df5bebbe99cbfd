//! # Provider Runtime
//!
//! Schema types emitted by the generator, plus the generic lifecycle engine
//! that drives them against Vault.
//!
//! A generated file only declares a [`ResourceSchema`]. Everything else
//! lives here:
//!
//! - [`EndpointResource`] resolves the endpoint template from configured
//!   state on create, re-derives path parameters from the id on read, and
//!   type-checks every value crossing the wire
//! - [`VaultClient`] is the seam to Vault; [`HttpVaultClient`] speaks the
//!   HTTP API, tests substitute an in-memory client
//! - [`ResourceData`] holds one instance's id and attribute values
//!
//! ```rust,no_run
//! use vault_provider_codegen::config::ClientConfig;
//! use vault_provider_codegen::provider::{
//!     Attribute, AttributeType, EndpointResource, HttpVaultClient, ResourceData, ResourceSchema,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let schema = ResourceSchema::resource("/transform/alphabet/{name}")
//!     .with_attribute(Attribute::mount())
//!     .with_attribute(Attribute::new("name", AttributeType::String).required().in_path())
//!     .with_attribute(Attribute::new("alphabet", AttributeType::String));
//!
//! let client = HttpVaultClient::new(ClientConfig::from_env()?)?;
//! let resource = EndpointResource::new(schema, &client)?;
//!
//! let mut data = ResourceData::new()
//!     .with("path", "my-transform")
//!     .with("name", "digits")
//!     .with("alphabet", "0123456789");
//! resource.create(&mut data)?;
//! assert_eq!(data.id(), Some("/my-transform/alphabet/digits"));
//! # Ok(())
//! # }
//! ```

mod client;
mod data;
mod decode;
mod resource;
mod schema;

pub use client::{ClientError, Data, HttpVaultClient, VaultClient};
pub use data::ResourceData;
pub use decode::{decode_attribute, decode_response, encode_body, DecodeError};
pub use resource::{EndpointResource, ResourceError};
pub use schema::{Attribute, AttributeType, ElementType, ResourceKind, ResourceSchema};
