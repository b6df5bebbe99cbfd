use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

use super::client::{ClientError, Data, VaultClient};
use super::data::ResourceData;
use super::decode::{decode_response, encode_body, DecodeError};
use super::schema::{ResourceKind, ResourceSchema};
use crate::logging::redact;
use crate::path::{PathError, PathTemplate, MOUNT_PARAMETER};

/// Errors from a resource or data source lifecycle operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    Path(PathError),
    Client(ClientError),
    Decode(DecodeError),
    /// A required attribute is not configured
    MissingAttribute(String),
    /// The operation needs an existing resource id
    MissingId,
    /// Import target does not exist in Vault
    NotFound(String),
    /// Resource operation on a data source schema or vice versa
    WrongKind {
        expected: ResourceKind,
        found: ResourceKind,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Path(e) => write!(f, "{}", e),
            ResourceError::Client(e) => write!(f, "{}", e),
            ResourceError::Decode(e) => write!(f, "{}", e),
            ResourceError::MissingAttribute(name) => {
                write!(f, "required attribute '{}' is not set", name)
            }
            ResourceError::MissingId => write!(f, "resource has no id"),
            ResourceError::NotFound(id) => write!(f, "nothing found in Vault at '{}'", id),
            ResourceError::WrongKind { expected, found } => {
                write!(f, "operation expects a {} but schema is a {}", expected, found)
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Path(e) => Some(e),
            ResourceError::Client(e) => Some(e),
            ResourceError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PathError> for ResourceError {
    fn from(e: PathError) -> Self {
        ResourceError::Path(e)
    }
}

impl From<ClientError> for ResourceError {
    fn from(e: ClientError) -> Self {
        ResourceError::Client(e)
    }
}

impl From<DecodeError> for ResourceError {
    fn from(e: DecodeError) -> Self {
        ResourceError::Decode(e)
    }
}

/// Lifecycle handlers shared by every generated resource and data source.
///
/// The id of a managed resource is its resolved Vault path. Path
/// parameters are recovered from the id on read, which is what makes
/// `import` work with nothing but a path.
pub struct EndpointResource<'a, C: VaultClient + ?Sized> {
    schema: ResourceSchema,
    template: PathTemplate,
    client: &'a C,
}

impl<'a, C: VaultClient + ?Sized> EndpointResource<'a, C> {
    /// # Errors
    ///
    /// Fails when the schema's endpoint is not a valid template.
    pub fn new(schema: ResourceSchema, client: &'a C) -> Result<Self, ResourceError> {
        let template = schema.template()?;
        Ok(Self {
            schema,
            template,
            client,
        })
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    fn expect_kind(&self, expected: ResourceKind) -> Result<(), ResourceError> {
        if self.schema.kind == expected {
            Ok(())
        } else {
            Err(ResourceError::WrongKind {
                expected,
                found: self.schema.kind,
            })
        }
    }

    fn resolved_path(&self, data: &ResourceData) -> Result<String, ResourceError> {
        let mount = data
            .mount()
            .filter(|m| !m.trim_matches('/').is_empty())
            .ok_or_else(|| ResourceError::MissingAttribute(MOUNT_PARAMETER.to_string()))?;
        for attribute in self.schema.attributes.iter().filter(|a| a.required && a.in_path) {
            if data.get(&attribute.name).is_none() {
                return Err(ResourceError::MissingAttribute(attribute.name.clone()));
            }
        }
        Ok(self.template.resolve_complete(mount, data)?)
    }

    /// Body with sensitive values masked, for logs only.
    fn loggable(&self, body: &Data) -> Value {
        body.iter()
            .map(|(name, value)| {
                let sensitive = self.schema.attribute(name).is_some_and(|a| a.sensitive);
                (name.clone(), redact(value, sensitive))
            })
            .collect::<serde_json::Map<_, _>>()
            .into()
    }

    fn apply_response(&self, data: &mut ResourceData, response: &Data) -> Result<(), ResourceError> {
        for (name, value) in decode_response(&self.schema, response)? {
            data.set(name, value);
        }
        Ok(())
    }

    /// Write the configuration to the resolved path, then read it back.
    ///
    /// # Errors
    ///
    /// Unresolved placeholders fail before any request is made.
    pub fn create(&self, data: &mut ResourceData) -> Result<(), ResourceError> {
        self.expect_kind(ResourceKind::Resource)?;
        let path = self.resolved_path(data)?;
        let body = encode_body(&self.schema, data)?;
        info!(endpoint = %self.schema.endpoint, path = %path, "Creating resource");
        debug!(body = %self.loggable(&body), "Create request body");
        self.client.write(&path, &body)?;
        data.set_id(path);
        self.read(data)
    }

    /// Refresh state from Vault.
    ///
    /// Path parameters are re-derived from the id. A resource missing in
    /// Vault has its id cleared so it drops out of state.
    ///
    /// # Errors
    ///
    /// An id that does not fit the endpoint template is reported as
    /// [`PathError::PathMismatch`] instead of silently dropping state.
    pub fn read(&self, data: &mut ResourceData) -> Result<(), ResourceError> {
        let id = data.id().ok_or(ResourceError::MissingId)?.to_string();
        let params = self.template.extract(&id).inspect_err(|e| {
            warn!(endpoint = %self.schema.endpoint, id = %id, error = %e, "Resource id does not match endpoint");
        })?;
        for (name, value) in params {
            data.set(name, value);
        }

        match self.client.read(&id)? {
            None => {
                warn!(id = %id, "Resource not found in Vault, removing from state");
                data.clear_id();
                Ok(())
            }
            Some(response) => self.apply_response(data, &response),
        }
    }

    /// Write the configured in-place attributes to the existing id and read
    /// back. ForceNew attributes are never sent on update.
    pub fn update(&self, data: &mut ResourceData) -> Result<(), ResourceError> {
        self.expect_kind(ResourceKind::Resource)?;
        let id = data.id().ok_or(ResourceError::MissingId)?.to_string();
        let mut body = encode_body(&self.schema, data)?;
        body.retain(|name, _| !self.schema.attribute(name).is_some_and(|a| a.force_new));
        info!(path = %id, "Updating resource");
        debug!(body = %self.loggable(&body), "Update request body");
        self.client.write(&id, &body)?;
        self.read(data)
    }

    pub fn delete(&self, data: &mut ResourceData) -> Result<(), ResourceError> {
        self.expect_kind(ResourceKind::Resource)?;
        let id = data.id().ok_or(ResourceError::MissingId)?.to_string();
        info!(path = %id, "Deleting resource");
        self.client.delete(&id)?;
        data.clear_id();
        Ok(())
    }

    /// Adopt an existing Vault object by its path.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] when nothing exists at `id`.
    pub fn import(&self, id: &str) -> Result<ResourceData, ResourceError> {
        self.expect_kind(ResourceKind::Resource)?;
        let mut data = ResourceData::new();
        data.set_id(id);
        self.read(&mut data)?;
        if data.id().is_none() {
            return Err(ResourceError::NotFound(id.to_string()));
        }
        Ok(data)
    }

    /// Evaluate a data source.
    ///
    /// Data source endpoints are Vault operations that only accept writes.
    /// The inputs are always written to the resolved path, even when there
    /// are none, and computed attributes are taken from the response. The id
    /// becomes the resolved path.
    pub fn read_data_source(&self, data: &mut ResourceData) -> Result<(), ResourceError> {
        self.expect_kind(ResourceKind::DataSource)?;
        let path = self.resolved_path(data)?;
        let body = encode_body(&self.schema, data)?;
        info!(endpoint = %self.schema.endpoint, path = %path, "Reading data source");
        debug!(body = %self.loggable(&body), "Data source request body");

        if let Some(response) = self.client.write(&path, &body)? {
            self.apply_response(data, &response)?;
        }
        data.set_id(path);
        Ok(())
    }
}
