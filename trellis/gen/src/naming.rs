//! Names derived from schema and accessor names.
//!
//! ## Conventions
//!
//! - Adapter type: `<Schema>Impl` (`Person` -> `PersonImpl`)
//! - Adapter file: snake case plus `_impl.rs` (`SoftwareProject` -> `software_project_impl.rs`)
//! - Default label: the lowercased schema name (`SoftwareProject` -> `softwareproject`)
//! - Derived name: the method name minus its `get_`/`set_`/`add_` prefix

use inflector::Inflector;

/// Suffix appended to a schema name to form its adapter type name.
pub const ADAPTER_SUFFIX: &str = "Impl";

pub fn adapter_name(schema: &str) -> String {
    format!("{schema}{ADAPTER_SUFFIX}")
}

pub fn adapter_file_name(schema: &str) -> String {
    format!("{}_impl.rs", schema.to_snake_case())
}

pub fn default_label(schema: &str) -> String {
    schema.to_lowercase()
}

/// Strips `prefix` from a method name and lowercases the first remaining
/// character. Returns `None` if the name lacks the prefix or nothing remains.
///
/// ## Examples
///
/// ```
/// use trellis_gen::naming::derived_name;
///
/// assert_eq!(derived_name("get_name", "get_"), Some("name".to_string()));
/// assert_eq!(derived_name("get_Name", "get_"), Some("name".to_string()));
/// assert_eq!(derived_name("get_", "get_"), None);
/// assert_eq!(derived_name("name", "get_"), None);
/// ```
pub fn derived_name(method: &str, prefix: &str) -> Option<String> {
    let rest = method.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}
