//! Build-script entry points.
//!
//! A schema crate runs the generator from its `build.rs` and includes the
//! aggregate next to its schema traits:
//!
//! ```ignore
//! // build.rs
//! fn main() -> Result<(), trellis_gen::errors::GeneratorError> {
//!     trellis_gen::buildscript::generate(&["src/schema.rs"])?;
//!     Ok(())
//! }
//!
//! // src/schema.rs
//! include!(concat!(env!("OUT_DIR"), "/trellis/adapters.rs"));
//! ```
//!
//! Unsupported accessors and failed schema types are reported as
//! `cargo:warning` lines, so they show up in the normal build output.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::output::GenerationReport;

/// Directory under `OUT_DIR` that receives the generated files.
pub const OUT_SUBDIR: &str = "trellis";

/// Generates adapters for `inputs` into `$OUT_DIR/trellis`.
pub fn generate<P: AsRef<Path>>(inputs: &[P]) -> Result<GenerationReport, GeneratorError> {
    let config = GeneratorConfig {
        inputs: inputs.iter().map(|input| input.as_ref().to_path_buf()).collect(),
        ..GeneratorConfig::default()
    };
    generate_with_config(config)
}

/// Generates a batch described by `config`, with `output` replaced by
/// `$OUT_DIR/trellis`.
pub fn generate_with_config(mut config: GeneratorConfig) -> Result<GenerationReport, GeneratorError> {
    config.output = out_dir()?.join(OUT_SUBDIR);

    for input in &config.inputs {
        println!("cargo:rerun-if-changed={}", input.display());
    }

    let report = crate::run(&config, false)?;
    for line in cargo_warnings(&report) {
        println!("cargo:warning={line}");
    }
    Ok(report)
}

fn out_dir() -> Result<PathBuf, GeneratorError> {
    env::var_os("OUT_DIR").map(PathBuf::from).ok_or_else(|| {
        GeneratorError::ConfigError("OUT_DIR is not set; run from a build script".to_string())
    })
}

/// The `cargo:warning` lines for a report: one per diagnostic warning, then
/// one per failed schema type.
pub fn cargo_warnings(report: &GenerationReport) -> Vec<String> {
    report
        .diagnostics
        .warnings()
        .map(ToString::to_string)
        .chain(
            report
                .failures
                .iter()
                .map(|failure| format!("trellis: adapter for `{}` not generated: {}", failure.schema, failure.error)),
        )
        .collect()
}
