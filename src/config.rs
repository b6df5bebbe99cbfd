//! # Configuration Module
//!
//! Explicit configuration structs for the generator and the Vault client.
//! Both are built once by the caller (usually from the environment, then
//! overridden by CLI flags) and passed by reference; nothing is read from
//! disk or the environment at load time.
//!
//! ## Environment Variables
//!
//! | Variable | Used by | Default |
//! |---|---|---|
//! | `VAULT_CODEGEN_HOME` | generator output root | current directory |
//! | `VAULT_ADDR` | client | `http://127.0.0.1:8200` |
//! | `VAULT_TOKEN` | client | none |
//! | `VAULT_NAMESPACE` | client | none |
//! | `VAULT_CLIENT_TIMEOUT` | client, seconds | `60` |

use anyhow::Context;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_VAULT_ADDR: &str = "http://127.0.0.1:8200";
const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 60;

/// Where the generator writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Repository root all other paths are relative to
    pub home_dir: PathBuf,
    /// Code output directory, relative to `home_dir`
    pub code_dir: PathBuf,
    /// Documentation output directory, relative to `home_dir`
    pub docs_dir: PathBuf,
    /// Report what would be written without touching the filesystem
    pub dry_run: bool,
    /// Run rustfmt over generated code after a run
    pub format: bool,
}

impl GeneratorConfig {
    pub fn new(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
            code_dir: PathBuf::from("generated"),
            docs_dir: PathBuf::from("website").join("docs"),
            dry_run: false,
            format: false,
        }
    }

    /// Load from `VAULT_CODEGEN_HOME`, defaulting to the current directory.
    pub fn from_env() -> Self {
        let home = env::var_os("VAULT_CODEGEN_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(home)
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: bool) -> Self {
        self.format = format;
        self
    }

    pub fn code_root(&self) -> PathBuf {
        self.home_dir.join(&self.code_dir)
    }

    pub fn docs_root(&self) -> PathBuf {
        self.home_dir.join(&self.docs_dir)
    }
}

/// Connection settings for [`HttpVaultClient`](crate::provider::HttpVaultClient).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub address: Url,
    pub token: Option<String>,
    pub namespace: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("address", &self.address.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("namespace", &self.namespace)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// # Errors
    ///
    /// Fails when `address` is not a valid URL.
    pub fn new(address: &str) -> anyhow::Result<Self> {
        let address =
            Url::parse(address).with_context(|| format!("Invalid Vault address '{address}'"))?;
        Ok(Self {
            address,
            token: None,
            namespace: None,
            timeout: Duration::from_secs(DEFAULT_CLIENT_TIMEOUT_SECS),
        })
    }

    /// Load from `VAULT_ADDR`, `VAULT_TOKEN`, `VAULT_NAMESPACE` and
    /// `VAULT_CLIENT_TIMEOUT`.
    ///
    /// # Errors
    ///
    /// Fails when `VAULT_ADDR` is not a valid URL.
    pub fn from_env() -> anyhow::Result<Self> {
        let address = env::var("VAULT_ADDR").unwrap_or_else(|_| DEFAULT_VAULT_ADDR.to_string());
        let timeout = env::var("VAULT_CLIENT_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CLIENT_TIMEOUT_SECS);
        Ok(Self {
            token: env::var("VAULT_TOKEN").ok().filter(|t| !t.is_empty()),
            namespace: env::var("VAULT_NAMESPACE").ok().filter(|n| !n.is_empty()),
            timeout: Duration::from_secs(timeout),
            ..Self::new(&address)?
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_paths() {
        let config = GeneratorConfig::new("/repo");
        assert_eq!(config.code_root(), PathBuf::from("/repo/generated"));
        assert_eq!(config.docs_root(), PathBuf::from("/repo/website/docs"));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_client_config_rejects_bad_address() {
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn test_client_config_debug_redacts_token() {
        let config = ClientConfig::new("http://vault:8200")
            .unwrap()
            .with_token("s.secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s.secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
