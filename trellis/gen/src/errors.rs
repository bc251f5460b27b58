//! Error types for the trellis generator.

use thiserror::Error;

/// Errors that can occur during code generation.
///
/// Read, parse, validation, and configuration errors abort the whole batch.
/// The remaining variants are raised for one schema type at a time; the
/// batch records them in its report and carries on with the next type.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to read an input file
    #[error("Failed to read input file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid Rust
    #[error("Failed to parse '{path}': {source}")]
    ParseError {
        path: String,
        #[source]
        source: syn::Error,
    },

    /// A schema attribute or accessor marker is malformed
    #[error("Invalid marker on {schema}::{method}: {message}")]
    InvalidMarker {
        schema: String,
        method: String,
        message: String,
    },

    /// A schema trait declares an item an adapter cannot implement
    #[error("Schema type '{schema}' declares {item}, which a generated adapter cannot implement")]
    UnsupportedItem { schema: String, item: String },

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A generated adapter name clashes with another declared or generated name.
    #[error("Naming collision for schema '{schema}': generated name '{adapter}' is already taken")]
    NamingCollision {
        /// The schema whose adapter would collide.
        schema: String,
        /// The colliding adapter type or file name.
        adapter: String,
    },

    /// Two schema traits in one batch share a name.
    #[error("Schema type '{name}' is declared more than once")]
    DuplicateSchema { name: String },

    /// A schema extends a schema of the other entity kind.
    #[error("Schema type '{schema}' cannot extend '{parent}': vertex and edge schemas do not mix")]
    HierarchyMismatch { schema: String, parent: String },
}

impl GeneratorError {
    /// Returns `true` if the error concerns a single schema type rather than
    /// the whole batch.
    pub fn is_per_type(&self) -> bool {
        matches!(
            self,
            Self::InvalidMarker { .. }
                | Self::UnsupportedItem { .. }
                | Self::CodeGenError(_)
                | Self::WriteError { .. }
        )
    }
}
