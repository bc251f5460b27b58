//! Batch-wide checks run before any code is generated.
//!
//! Everything checked here concerns more than one schema type or the batch
//! configuration, so a failure aborts the whole batch.

use std::collections::HashSet;

use tracing::debug;

use crate::codegen::runtime_path;
use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::model::Catalog;
use crate::naming::{adapter_file_name, adapter_name};

/// Validates the configuration and the catalog of one batch.
///
/// ## Errors
///
/// - `ConfigError` for empty inputs, an unusable runtime crate path, or an
///   aggregate file name that is not a distinct `.rs` file
/// - `DuplicateSchema` when two schema traits share a name
/// - `NamingCollision` when an adapter name or file name is already taken
/// - `HierarchyMismatch` when a schema extends a schema of the other kind
pub fn validate(config: &GeneratorConfig, catalog: &Catalog) -> Result<(), GeneratorError> {
    validate_config(config)?;
    validate_catalog(catalog, &config.aggregate_file)?;
    debug!(schemas = catalog.len(), "batch validated");
    Ok(())
}

pub fn validate_config(config: &GeneratorConfig) -> Result<(), GeneratorError> {
    if config.inputs.is_empty() {
        return Err(GeneratorError::ConfigError(
            "at least one input file is required".to_string(),
        ));
    }
    runtime_path(&config.runtime_crate)?;
    if !config.aggregate_file.ends_with(".rs") || config.aggregate_file.contains(['/', '\\']) {
        return Err(GeneratorError::ConfigError(format!(
            "aggregate file '{}' must be a plain `.rs` file name",
            config.aggregate_file
        )));
    }
    Ok(())
}

pub fn validate_catalog(catalog: &Catalog, aggregate_file: &str) -> Result<(), GeneratorError> {
    let mut names = HashSet::new();
    for schema in catalog {
        if !names.insert(schema.name.as_str()) {
            return Err(GeneratorError::DuplicateSchema {
                name: schema.name.clone(),
            });
        }
    }

    let mut files = HashSet::new();
    for schema in catalog {
        let adapter = adapter_name(&schema.name);
        if names.contains(adapter.as_str()) {
            return Err(GeneratorError::NamingCollision {
                schema: schema.name.clone(),
                adapter,
            });
        }

        let file_name = adapter_file_name(&schema.name);
        if file_name == aggregate_file || files.contains(&file_name) {
            return Err(GeneratorError::NamingCollision {
                schema: schema.name.clone(),
                adapter: file_name,
            });
        }
        files.insert(file_name);

        if let Some(parent) = catalog.parent(schema)
            && parent.kind != schema.kind
        {
            return Err(GeneratorError::HierarchyMismatch {
                schema: schema.name.clone(),
                parent: parent.name.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{PERSON_SCHEMA, catalog_from};

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            inputs: vec!["src/schema.rs".into()],
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn person_schema_is_valid() {
        let catalog = catalog_from(PERSON_SCHEMA);
        assert!(validate(&config(), &catalog).is_ok());
    }

    #[test]
    fn duplicate_schema_names_are_rejected() {
        let catalog = catalog_from(
            r#"
            #[vertex]
            pub trait Person: FramedVertex {}

            #[vertex]
            pub trait Person: FramedVertex {}
            "#,
        );
        assert!(matches!(
            validate_catalog(&catalog, "adapters.rs"),
            Err(GeneratorError::DuplicateSchema { ref name }) if name == "Person"
        ));
    }

    #[test]
    fn adapter_names_must_not_shadow_schemas() {
        let catalog = catalog_from(
            r#"
            #[vertex]
            pub trait Person: FramedVertex {}

            #[vertex]
            pub trait PersonImpl: FramedVertex {}
            "#,
        );
        assert!(matches!(
            validate_catalog(&catalog, "adapters.rs"),
            Err(GeneratorError::NamingCollision { ref adapter, .. }) if adapter == "PersonImpl"
        ));
    }

    #[test]
    fn adapter_file_names_must_be_distinct() {
        let catalog = catalog_from(
            r#"
            #[vertex]
            pub trait HTTPServer: FramedVertex {}

            #[vertex]
            pub trait HttpServer: FramedVertex {}
            "#,
        );
        assert!(matches!(
            validate_catalog(&catalog, "adapters.rs"),
            Err(GeneratorError::NamingCollision { ref adapter, .. }) if adapter == "http_server_impl.rs"
        ));
    }

    #[test]
    fn aggregate_must_not_clash_with_adapters() {
        let catalog = catalog_from(PERSON_SCHEMA);
        assert!(matches!(
            validate_catalog(&catalog, "person_impl.rs"),
            Err(GeneratorError::NamingCollision { .. })
        ));
    }

    #[test]
    fn mixed_hierarchies_are_rejected() {
        let catalog = catalog_from(
            r#"
            #[edge]
            pub trait Knows: FramedEdge {}

            #[vertex]
            pub trait Person: Knows {}
            "#,
        );
        assert!(matches!(
            validate_catalog(&catalog, "adapters.rs"),
            Err(GeneratorError::HierarchyMismatch { ref schema, ref parent })
                if schema == "Person" && parent == "Knows"
        ));
    }

    #[test]
    fn config_problems() {
        let empty = GeneratorConfig::default();
        assert!(matches!(validate_config(&empty), Err(GeneratorError::ConfigError(_))));

        let bad_runtime = GeneratorConfig {
            runtime_crate: "not a path".to_string(),
            ..config()
        };
        assert!(matches!(validate_config(&bad_runtime), Err(GeneratorError::ConfigError(_))));

        let bad_aggregate = GeneratorConfig {
            aggregate_file: "nested/adapters.rs".to_string(),
            ..config()
        };
        assert!(matches!(validate_config(&bad_aggregate), Err(GeneratorError::ConfigError(_))));
    }
}
