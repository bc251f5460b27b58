//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of a batch: validating each adapter,
//! formatting it, writing it to disk, and writing the aggregate that
//! includes every adapter that made it.
//!
//! ## Output Structure
//!
//! ```text
//! <output>/
//! ├── adapters.rs        # include! list and adapter registry
//! ├── person_impl.rs     # one file per schema type
//! └── knows_impl.rs
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes
//! - **Stable output**: Files whose content would not change are not touched
//! - **Isolation**: A failure for one schema type leaves the others intact

use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use tracing::{debug, info, warn};

use crate::codegen::{Codegen, GeneratedAdapter, generate_adapter, generate_aggregate, runtime_path};
use crate::config::GeneratorConfig;
use crate::diagnostics::Diagnostics;
use crate::errors::GeneratorError;
use crate::model::Catalog;

/// Header line placed at the top of every generated file.
pub const GENERATED_HEADER: &str =
    "// This code was automatically generated by trellis-gen. Do not edit manually.";

/// Validates generated code by parsing it with `syn`.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats a parsed file with `prettyplease` and prepends the header.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!("{}\n\n{}", GENERATED_HEADER, formatted)
}

/// Validates and formats generated tokens.
pub fn render(tokens: &TokenStream) -> Result<String, GeneratorError> {
    validate_code(tokens).map(|file| format_code(&file))
}

/// Writes `content` to `path` through a temporary file and a rename.
///
/// Parent directories are created as needed. The temporary file is removed
/// if the rename fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(GeneratorError::WriteError {
            path: path.display().to_string(),
            source: e,
        });
    }

    Ok(())
}

/// Whether a write changed the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// Writes `content` unless `path` already holds exactly that content.
pub fn write_if_changed(path: &Path, content: &str) -> Result<WriteOutcome, GeneratorError> {
    if let Ok(existing) = fs::read_to_string(path)
        && existing == content
    {
        debug!(path = %path.display(), "unchanged");
        return Ok(WriteOutcome::Unchanged);
    }
    write_atomic(path, content)?;
    info!(path = %path.display(), "wrote generated file");
    Ok(WriteOutcome::Written)
}

/// One formatted output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// The schema type of an adapter file; `None` for the aggregate.
    pub schema: Option<String>,
    pub file_name: String,
    pub content: String,
}

/// A schema type that could not be generated.
#[derive(Debug)]
pub struct TypeFailure {
    pub schema: String,
    pub error: GeneratorError,
}

/// The outcome of one batch.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Every file of the batch, in generation order, aggregate last.
    pub files: Vec<RenderedFile>,
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub failures: Vec<TypeFailure>,
    pub diagnostics: Diagnostics,
    pub dry_run: bool,
}

impl GenerationReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// The rendered adapter of `schema`, if it was generated.
    pub fn adapter(&self, schema: &str) -> Option<&RenderedFile> {
        self.files
            .iter()
            .find(|file| file.schema.as_deref() == Some(schema))
    }

    fn fail(&mut self, schema: &str, error: GeneratorError) {
        warn!(schema, %error, "failed to generate adapter");
        self.failures.push(TypeFailure {
            schema: schema.to_string(),
            error,
        });
    }
}

/// Generates, validates, and writes the adapters of `catalog` plus the
/// aggregate.
///
/// In dry-run mode every file is printed to stdout and nothing is written.
///
/// ## Errors
///
/// Per-type failures are recorded in the report. An error is returned only
/// for batch failures: an unusable runtime crate path, or an aggregate that
/// cannot be rendered or written.
pub fn generate(
    catalog: &Catalog,
    config: &GeneratorConfig,
    dry_run: bool,
) -> Result<GenerationReport, GeneratorError> {
    let runtime = runtime_path(&config.runtime_crate)?;
    let cg = Codegen {
        catalog,
        runtime: &runtime,
    };
    let mut report = GenerationReport {
        dry_run,
        ..GenerationReport::default()
    };

    let mut included: Vec<GeneratedAdapter> = Vec::new();
    for schema in catalog {
        let rendered = generate_adapter(cg, schema, &mut report.diagnostics)
            .and_then(|adapter| render(&adapter.tokens).map(|content| (adapter, content)));
        let (adapter, content) = match rendered {
            Ok(rendered) => rendered,
            Err(error) => {
                report.fail(&schema.name, error);
                continue;
            }
        };

        if !dry_run {
            let path = config.output.join(&adapter.file_name);
            match write_if_changed(&path, &content) {
                Ok(WriteOutcome::Written) => report.written.push(path),
                Ok(WriteOutcome::Unchanged) => report.unchanged.push(path),
                Err(error) => {
                    report.fail(&schema.name, error);
                    continue;
                }
            }
        }

        debug!(
            schema = %schema.name,
            adapter = %adapter.adapter,
            methods = adapter.method_count,
            "generated adapter"
        );
        report.files.push(RenderedFile {
            schema: Some(schema.name.clone()),
            file_name: adapter.file_name.clone(),
            content,
        });
        included.push(adapter);
    }

    let refs: Vec<&GeneratedAdapter> = included.iter().collect();
    let aggregate = render(&generate_aggregate(cg, &refs))?;
    if !dry_run {
        let path = config.output.join(&config.aggregate_file);
        match write_if_changed(&path, &aggregate)? {
            WriteOutcome::Written => report.written.push(path),
            WriteOutcome::Unchanged => report.unchanged.push(path),
        }
    }
    report.files.push(RenderedFile {
        schema: None,
        file_name: config.aggregate_file.clone(),
        content: aggregate,
    });

    if dry_run {
        for file in &report.files {
            println!("=== {} ===\n{}\n", file.file_name, file.content);
        }
    }

    info!(
        adapters = included.len(),
        failures = report.failures.len(),
        warnings = report.diagnostics.warning_count(),
        "batch complete"
    );
    Ok(report)
}
