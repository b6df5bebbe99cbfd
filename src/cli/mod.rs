//! # CLI Module
//!
//! Command-line front end of the `vault-provider-gen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Render code and starter docs for every registered endpoint:
//!
//! ```bash
//! vault-provider-gen generate --openapi openapi.json --home . --fmt
//! ```
//!
//! Options:
//! - `--openapi <FILE>` - Vault OpenAPI document, JSON or YAML (required)
//! - `--home <DIR>` - Provider checkout that receives `generated/` and
//!   `website/docs/` (default: `VAULT_CODEGEN_HOME` or `.`)
//! - `--registry <FILE>` - TOML endpoint registry replacing the built-in one
//! - `--fmt` - Run rustfmt over the generated code
//! - `--dry-run` - Report what would be written without touching disk
//!
//! ### `resolve`
//!
//! ```bash
//! vault-provider-gen resolve --mount my-transform \
//!     --template '/transform/role/{name}' --param name=payments
//! # /my-transform/role/payments
//! ```
//!
//! ### `extract`
//!
//! ```bash
//! vault-provider-gen extract --template '/transform/role/{name}' \
//!     --path /my-transform/role/payments
//! # {"name":"payments","path":"my-transform"}
//! ```
//!
//! ### `endpoints`
//!
//! List the registered endpoints with their kind and Terraform type name.

mod commands;


pub use commands::{run_cli, run_command, Cli, Commands};
