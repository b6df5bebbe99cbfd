use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;

/// Body of a Vault request or the `data` object of its response.
pub type Data = Map<String, Value>;

/// Errors from talking to Vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced an HTTP response
    Transport(String),
    /// Vault answered with a non-success status
    Status {
        status: u16,
        path: String,
        /// Vault's `errors` array, if it sent one
        errors: Vec<String>,
    },
    /// The response body was not the JSON Vault normally sends
    InvalidResponse(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "error talking to Vault: {}", msg),
            ClientError::Status {
                status,
                path,
                errors,
            } => {
                write!(f, "Vault returned {} for '{}'", status, path)?;
                if !errors.is_empty() {
                    write!(f, ": {}", errors.join("; "))?;
                }
                Ok(())
            }
            ClientError::InvalidResponse(msg) => write!(f, "invalid response from Vault: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// Logical read/write/delete against resolved Vault paths.
///
/// Paths are literal, e.g. `/my-transform/role/payments`; the `/v1` prefix
/// belongs to the transport.
pub trait VaultClient {
    /// `None` when nothing exists at `path`.
    fn read(&self, path: &str) -> Result<Option<Data>, ClientError>;

    /// Returns the response `data`, if any.
    fn write(&self, path: &str, body: &Data) -> Result<Option<Data>, ClientError>;

    fn delete(&self, path: &str) -> Result<(), ClientError>;
}

/// Blocking HTTP implementation of [`VaultClient`].
pub struct HttpVaultClient {
    config: ClientConfig,
    http: Client,
}

impl HttpVaultClient {
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self { config, http })
    }

    /// `<address>/v1/<path>`, keeping any path prefix on the address.
    /// Segments are percent-encoded so values never leak into the query.
    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let mut url = self.config.address.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Transport(format!(
                    "Vault address '{}' cannot carry a path",
                    self.config.address
                ))
            })?
            .pop_if_empty()
            .push("v1")
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Data>,
    ) -> Result<Option<Data>, ClientError> {
        let url = self.url(path)?;
        let mut request = self.http.request(method.clone(), url);
        if let Some(token) = &self.config.token {
            request = request.header("X-Vault-Token", token);
        }
        if let Some(namespace) = &self.config.namespace {
            request = request.header("X-Vault-Namespace", namespace);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status();
        debug!(method = %method, path = %path, status = status.as_u16(), "Vault request");

        if status == StatusCode::NOT_FOUND && method == Method::GET {
            return Ok(None);
        }
        let text = response
            .text()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                errors: vault_errors(&text),
            });
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        Ok(value.get("data").and_then(Value::as_object).cloned())
    }
}

fn vault_errors(body: &str) -> Vec<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("errors").and_then(Value::as_array).cloned())
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

impl VaultClient for HttpVaultClient {
    fn read(&self, path: &str) -> Result<Option<Data>, ClientError> {
        self.request(Method::GET, path, None)
    }

    fn write(&self, path: &str, body: &Data) -> Result<Option<Data>, ClientError> {
        self.request(Method::PUT, path, Some(body))
    }

    fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.request(Method::DELETE, path, None).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_v1_prefix() {
        let client =
            HttpVaultClient::new(ClientConfig::new("http://127.0.0.1:8200").unwrap()).unwrap();
        assert_eq!(
            client.url("/tf/role/r1").unwrap().as_str(),
            "http://127.0.0.1:8200/v1/tf/role/r1"
        );

        for address in ["https://proxy.example/vault", "https://proxy.example/vault/"] {
            let client = HttpVaultClient::new(ClientConfig::new(address).unwrap()).unwrap();
            assert_eq!(
                client.url("nested/tf/role/r1").unwrap().as_str(),
                "https://proxy.example/vault/v1/nested/tf/role/r1"
            );
        }
    }

    #[test]
    fn test_vault_errors_parsing() {
        assert_eq!(
            vault_errors(r#"{"errors":["permission denied"]}"#),
            vec!["permission denied".to_string()]
        );
        assert!(vault_errors("not json").is_empty());
    }

    #[test]
    fn test_status_error_display() {
        let err = ClientError::Status {
            status: 403,
            path: "/tf/role/r1".to_string(),
            errors: vec!["permission denied".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Vault returned 403 for '/tf/role/r1': permission denied"
        );
    }
}
