//! Trellis code generator library.
//!
//! This crate turns schema traits declared with `#[vertex]` and `#[edge]`
//! into adapter types that implement those traits on top of a
//! [`trellis`](https://docs.rs/trellis) graph. For every schema trait the
//! generated code includes:
//!
//! - An adapter struct `<Schema>Impl` wrapping a graph element
//! - One method per abstract accessor: property reads and writes,
//!   relationship traversal, and edge creation
//! - Equality, hashing and formatting based on the wrapped element
//!
//! A batch also gets an aggregate file that includes every adapter and
//! registers them with a `trellis::Registry`.
//!
//! ## Modules
//!
//! - [`extract`] - Schema discovery in source files
//! - [`classify`] - Accessor classification by shape
//! - [`resolve`] - Property and relationship semantics of each accessor
//! - [`codegen`] - Code generation for adapters and the aggregate
//! - [`output`] - Validation, formatting, and file writing
//! - [`diagnostics`] - Warnings for unsupported accessors
//! - [`buildscript`] - Entry points for `build.rs`
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use trellis_gen::config::GeneratorConfig;
//!
//! let config = GeneratorConfig {
//!     inputs: vec!["src/schema.rs".into()],
//!     ..GeneratorConfig::default()
//! };
//!
//! let report = trellis_gen::run(&config, true).unwrap();
//! for diagnostic in &report.diagnostics {
//!     println!("{}", diagnostic);
//! }
//! ```
//!
//! ## Generated Code Structure
//!
//! For a schema `#[vertex] pub trait Person: FramedVertex { .. }`:
//!
//! ```text
//! pub struct PersonImpl {
//!     graph: ::trellis::FramedGraph,
//!     vertex: ::trellis::Vertex,
//! }
//!
//! impl PersonImpl {
//!     pub const LABEL: &'static str = "person";
//!     pub fn new(vertex: ::trellis::Vertex, graph: ::trellis::FramedGraph) -> Self;
//!     pub fn boxed(vertex: ::trellis::Vertex, graph: ::trellis::FramedGraph) -> Box<dyn Person>;
//! }
//!
//! impl Person for PersonImpl { .. }
//! ```

pub mod buildscript;
pub mod classify;
pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod extract;
pub mod inflection;
pub mod model;
pub mod naming;
pub mod output;
pub mod resolve;
pub mod validation;

#[cfg(test)]
mod test_utils;

use config::GeneratorConfig;
use errors::GeneratorError;
use output::GenerationReport;

/// Runs one batch: loads the schema catalog, validates it, and generates
/// every adapter plus the aggregate.
///
/// ## Errors
///
/// Returns an error for batch failures only. Schema types that fail on
/// their own are listed in [`GenerationReport::failures`].
pub fn run(config: &GeneratorConfig, dry_run: bool) -> Result<GenerationReport, GeneratorError> {
    let catalog = extract::load_catalog(&config.inputs)?;
    validation::validate(config, &catalog)?;
    output::generate(&catalog, config, dry_run)
}
