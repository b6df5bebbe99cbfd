use anyhow::Context;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::GeneratorConfig;
use crate::generator::{terraform_type_name, EndpointRegistry, Generator};
use crate::openapi::load_catalog;
use crate::path::PathTemplate;

/// Command-line interface for the Vault provider generator
#[derive(Parser)]
#[command(name = "vault-provider-gen")]
#[command(about = "Generate Vault provider resources from OpenAPI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate resource code and starter docs for registered endpoints
    Generate {
        /// Vault OpenAPI document (YAML or JSON)
        #[arg(long)]
        openapi: PathBuf,

        /// Provider checkout receiving generated/ and website/docs/
        #[arg(long, env = "VAULT_CODEGEN_HOME")]
        home: Option<PathBuf>,

        /// TOML endpoint registry replacing the built-in one
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Run rustfmt over generated code
        #[arg(long, default_value_t = false)]
        fmt: bool,

        /// Report what would be written without touching disk
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Resolve an endpoint template into a literal Vault path
    Resolve {
        /// Mount path of the secrets engine or auth method
        #[arg(long)]
        mount: String,

        #[arg(long)]
        template: String,

        /// Placeholder value as name=value (repeatable)
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// Extract mount and placeholder values from a literal Vault path
    Extract {
        #[arg(long)]
        template: String,

        #[arg(long)]
        path: String,
    },
    /// List registered endpoints
    Endpoints {
        /// TOML endpoint registry replacing the built-in one
        #[arg(long)]
        registry: Option<PathBuf>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn load_registry(path: Option<&Path>) -> anyhow::Result<EndpointRegistry> {
    match path {
        Some(path) => EndpointRegistry::from_toml_file(path),
        None => Ok(EndpointRegistry::builtin()),
    }
}

/// Parse the process arguments and run the selected command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_command(&cli.command, &mut std::io::stdout().lock())
}

/// Run one command, writing its result to `out`.
pub fn run_command(command: &Commands, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            openapi,
            home,
            registry,
            fmt,
            dry_run,
        } => {
            let registry = load_registry(registry.as_deref())?;
            let catalog = load_catalog(openapi)?;
            let config = match home {
                Some(home) => GeneratorConfig::new(home),
                None => GeneratorConfig::from_env(),
            }
            .with_dry_run(*dry_run)
            .with_format(*fmt);

            let report = Generator::new(&config, &registry).run(&catalog)?;
            let verb = if *dry_run { "would generate" } else { "generated" };
            writeln!(
                out,
                "{} {} code file(s), {} module index(es), {} doc(s); {} doc(s) preserved",
                verb,
                report.code_files.len(),
                report.module_files.len(),
                report.docs_written.len(),
                report.docs_preserved.len()
            )?;
            for skipped in &report.skipped {
                writeln!(out, "skipped {}: {}", skipped.endpoint, skipped.reason)?;
            }
            Ok(())
        }
        Commands::Resolve {
            mount,
            template,
            params,
        } => {
            let template = PathTemplate::parse(template)?;
            let values: BTreeMap<String, String> = params.iter().cloned().collect();
            let path = template.resolve(mount, &values);
            info!(template = %template, path = %path, "Resolved");
            writeln!(out, "{path}")?;
            Ok(())
        }
        Commands::Extract { template, path } => {
            let template = PathTemplate::parse(template)?;
            let params = template.extract(path)?;
            let json = serde_json::to_string(&params).context("Failed to serialize parameters")?;
            writeln!(out, "{json}")?;
            Ok(())
        }
        Commands::Endpoints { registry } => {
            let registry = load_registry(registry.as_deref())?;
            for descriptor in registry.iter() {
                writeln!(
                    out,
                    "{:<12} {:<45} {}",
                    descriptor.kind.to_string(),
                    descriptor.endpoint,
                    terraform_type_name(&descriptor.endpoint)
                )?;
            }
            Ok(())
        }
    }
}
