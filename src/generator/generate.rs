use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, info_span, warn};

use super::format::format_files;
use super::naming::{code_file_path, doc_file_path, module_name};
use super::params::TemplatableEndpoint;
use super::registry::EndpointRegistry;
use super::templates::{render_code, write_code_file, write_doc_file, write_mod_rs};
use crate::config::GeneratorConfig;
use crate::openapi::PathCatalog;

/// An endpoint the generator could not render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEndpoint {
    pub endpoint: String,
    pub reason: String,
}

/// Outcome of a generator run.
///
/// In dry-run mode the file lists hold what *would* have been written.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub code_files: Vec<PathBuf>,
    pub module_files: Vec<PathBuf>,
    pub docs_written: Vec<PathBuf>,
    pub docs_preserved: Vec<PathBuf>,
    pub skipped: Vec<SkippedEndpoint>,
}

impl GenerationReport {
    fn skip(&mut self, endpoint: &str, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(endpoint = %endpoint, reason = %reason, "Skipping endpoint");
        self.skipped.push(SkippedEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        });
    }

    /// True when every registered endpoint was generated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Renders every registered endpoint found in an OpenAPI catalog.
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    registry: &'a EndpointRegistry,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GeneratorConfig, registry: &'a EndpointRegistry) -> Self {
        Self { config, registry }
    }

    /// Generate code and starter docs for every registered endpoint.
    ///
    /// Endpoints missing from `catalog` or using unsupported parameter
    /// types are skipped with a warning and listed in the report.
    /// Existing docs are never overwritten. Code output is sorted and
    /// therefore byte-identical across runs on the same input.
    ///
    /// # Errors
    ///
    /// Filesystem, template and formatting failures abort the run.
    pub fn run(&self, catalog: &PathCatalog) -> anyhow::Result<GenerationReport> {
        let code_root = self.config.code_root();
        let docs_root = self.config.docs_root();
        let mut report = GenerationReport::default();
        let mut modules: BTreeMap<PathBuf, BTreeSet<String>> = BTreeMap::new();

        info!(
            endpoints = self.registry.len(),
            catalog_paths = catalog.len(),
            code_root = ?code_root,
            docs_root = ?docs_root,
            dry_run = self.config.dry_run,
            "Starting code generation"
        );

        for descriptor in self.registry.iter() {
            let span = info_span!("endpoint", endpoint = %descriptor.endpoint);
            let _entered = span.enter();

            let Some(item) = catalog.get(&descriptor.endpoint) else {
                report.skip(&descriptor.endpoint, "not present in the OpenAPI catalog");
                continue;
            };
            let endpoint = TemplatableEndpoint::from_path_item(descriptor, catalog, item);
            if let Err(e) = endpoint.validate() {
                report.skip(&descriptor.endpoint, e.to_string());
                continue;
            }

            let relative_code = code_file_path(endpoint.kind, &endpoint.endpoint);
            let code_path = code_root.join(&relative_code);
            let doc_path = docs_root.join(doc_file_path(endpoint.kind, &endpoint.endpoint));
            register_modules(&mut modules, &relative_code);

            if self.config.dry_run {
                render_code(&endpoint)?;
                info!(file = ?code_path, "Would generate code file");
                report.code_files.push(code_path);
                if doc_path.exists() {
                    report.docs_preserved.push(doc_path);
                } else {
                    report.docs_written.push(doc_path);
                }
                continue;
            }

            create_parent(&code_path)?;
            write_code_file(&code_path, &endpoint)
                .with_context(|| format!("Failed to generate {:?}", code_path))?;
            report.code_files.push(code_path);

            create_parent(&doc_path)?;
            if write_doc_file(&doc_path, &endpoint)
                .with_context(|| format!("Failed to generate {:?}", doc_path))?
            {
                report.docs_written.push(doc_path);
            } else {
                report.docs_preserved.push(doc_path);
            }
        }

        for (dir, children) in &modules {
            let dir = code_root.join(dir);
            report.module_files.push(dir.join("mod.rs"));
            if !self.config.dry_run {
                let children: Vec<String> = children.iter().cloned().collect();
                write_mod_rs(&dir, &children)
                    .with_context(|| format!("Failed to write module index in {:?}", dir))?;
            }
        }

        if self.config.format && !self.config.dry_run {
            let files: Vec<PathBuf> = report
                .code_files
                .iter()
                .chain(report.module_files.iter())
                .cloned()
                .collect();
            format_files(&files)?;
        }

        info!(
            generated = report.code_files.len(),
            docs_written = report.docs_written.len(),
            docs_preserved = report.docs_preserved.len(),
            skipped = report.skipped.len(),
            "Code generation finished"
        );
        Ok(report)
    }
}

/// Generate with a one-off [`Generator`].
pub fn run(
    config: &GeneratorConfig,
    registry: &EndpointRegistry,
    catalog: &PathCatalog,
) -> anyhow::Result<GenerationReport> {
    Generator::new(config, registry).run(catalog)
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    Ok(())
}

/// Record each directory → child module edge of a generated file path.
fn register_modules(modules: &mut BTreeMap<PathBuf, BTreeSet<String>>, relative: &Path) {
    let mut dir = PathBuf::new();
    for component in relative.components() {
        let Component::Normal(name) = component else {
            continue;
        };
        let name = name.to_string_lossy();
        let stem = name.strip_suffix(".rs").unwrap_or(&*name);
        modules
            .entry(dir.clone())
            .or_default()
            .insert(module_name(stem));
        dir.push(&*name);
    }
}
