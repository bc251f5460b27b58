//! Code generation for schema adapters.
//!
//! Each schema trait gets one adapter type, produced by [`generate_adapter`],
//! and the batch gets one aggregate file, produced by [`generate_aggregate`].
//!
//! ## Submodules
//!
//! - [`adapter`] - The adapter struct, its constructors and trait impls
//! - [`methods`] - One method body per resolved accessor binding
//! - [`identity`] - Equality, hashing and formatting impls
//! - [`aggregate`] - The `include!` list and the adapter registry
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`, which is then:
//! - Validated with `syn::parse2` to ensure correctness
//! - Formatted with `prettyplease` for consistent style
//!
//! Generated code names the runtime crate through an absolute path
//! (`::trellis` by default), so it compiles wherever the aggregate is
//! included. See [`crate::output`] for the file writing logic.

pub mod adapter;
pub mod aggregate;
pub mod identity;
pub mod methods;

use proc_macro2::TokenStream;
use quote::ToTokens;

use crate::errors::GeneratorError;
use crate::model::Catalog;

pub use adapter::{GeneratedAdapter, generate_adapter};
pub use aggregate::generate_aggregate;

/// Everything the generators need besides the schema being generated.
#[derive(Debug, Clone, Copy)]
pub struct Codegen<'a> {
    pub catalog: &'a Catalog,
    /// Path of the runtime crate, ready to be interpolated.
    pub runtime: &'a TokenStream,
}

/// Turns the configured runtime crate name into a path token stream.
///
/// A bare crate name becomes an absolute path; paths starting with
/// `crate`, `self` or `super` are kept as written.
///
/// ## Examples
///
/// ```
/// use trellis_gen::codegen::runtime_path;
///
/// assert_eq!(runtime_path("trellis").unwrap().to_string(), ":: trellis");
/// assert_eq!(runtime_path("crate::runtime").unwrap().to_string(), "crate :: runtime");
/// assert!(runtime_path("not a path").is_err());
/// ```
pub fn runtime_path(name: &str) -> Result<TokenStream, GeneratorError> {
    let mut path: syn::Path = syn::parse_str(name).map_err(|e| {
        GeneratorError::ConfigError(format!("runtime crate '{}' is not a path: {}", name, e))
    })?;
    let relative = path
        .segments
        .first()
        .is_some_and(|first| ["crate", "self", "super"].iter().any(|kw| first.ident == kw));
    if !relative && path.leading_colon.is_none() {
        path.leading_colon = Some(Default::default());
    }
    Ok(path.to_token_stream())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_names_become_absolute() {
        assert_eq!(runtime_path("trellis").unwrap().to_string(), ":: trellis");
        assert_eq!(runtime_path("::trellis").unwrap().to_string(), ":: trellis");
    }

    #[test]
    fn relative_paths_are_kept() {
        assert_eq!(runtime_path("crate").unwrap().to_string(), "crate");
        assert_eq!(
            runtime_path("super::graph").unwrap().to_string(),
            "super :: graph"
        );
    }

    #[test]
    fn invalid_paths_are_config_errors() {
        assert!(matches!(
            runtime_path("trellis-runtime"),
            Err(GeneratorError::ConfigError(_))
        ));
    }
}
