//! Schema discovery and accessor collection.
//!
//! Input files are parsed with `syn`. Every top-level trait carrying a
//! `#[vertex]` or `#[edge]` attribute (bare or path-qualified, such as
//! `#[trellis::vertex]`) becomes a [`SchemaType`]. Schema traits nested in
//! an inline `mod` are skipped with a warning.

use std::fs;
use std::path::Path;

use syn::{Attribute, Ident, Item, ItemMod, ItemTrait, LitStr, Meta, TraitItem, TypeParamBound};
use tracing::{debug, warn};

use crate::errors::GeneratorError;
use crate::model::{
    AccessorDeclaration, Catalog, Direction, EntityKind, LinkMarker, Markers, SchemaIssue,
    SchemaType,
};
use crate::naming::default_label;

/// Loads every schema type from the given files, in file order.
///
/// ## Errors
///
/// Returns `GeneratorError::ReadError` or `GeneratorError::ParseError` for
/// the first file that cannot be read or parsed.
pub fn load_catalog<P: AsRef<Path>>(paths: &[P]) -> Result<Catalog, GeneratorError> {
    let mut schemas = Vec::new();
    for path in paths {
        schemas.extend(parse_file(path.as_ref())?);
    }
    Ok(Catalog::new(schemas))
}

/// Parses one source file and returns the schema types it declares.
pub fn parse_file(path: &Path) -> Result<Vec<SchemaType>, GeneratorError> {
    let source = fs::read_to_string(path).map_err(|e| GeneratorError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_source(&source, path)
}

/// Parses source text; `path` is recorded on each schema and used in errors.
pub fn parse_source(source: &str, path: &Path) -> Result<Vec<SchemaType>, GeneratorError> {
    let file = syn::parse_file(source).map_err(|e| GeneratorError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    let schemas: Vec<SchemaType> = file
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Trait(item) => schema_from_trait(item, path),
            _ => None,
        })
        .collect();

    for item in &file.items {
        if let Item::Mod(module) = item {
            warn_nested_schemas(module, &module.ident.to_string(), path);
        }
    }

    debug!(
        path = %path.display(),
        count = schemas.len(),
        "discovered schema types"
    );
    Ok(schemas)
}

fn warn_nested_schemas(module: &ItemMod, module_path: &str, path: &Path) {
    let Some((_, items)) = &module.content else {
        return;
    };
    for item in items {
        match item {
            Item::Trait(item) if item.attrs.iter().any(|a| schema_kind(a).is_some()) => {
                warn!(
                    path = %path.display(),
                    schema = %item.ident,
                    module = %module_path,
                    "skipping schema trait inside a nested module; declare it at file level"
                );
            }
            Item::Mod(inner) => {
                warn_nested_schemas(inner, &format!("{module_path}::{}", inner.ident), path);
            }
            _ => {}
        }
    }
}

fn schema_kind(attr: &Attribute) -> Option<EntityKind> {
    let last = attr.path().segments.last()?;
    if last.ident == "vertex" {
        Some(EntityKind::Vertex)
    } else if last.ident == "edge" {
        Some(EntityKind::Edge)
    } else {
        None
    }
}

fn schema_from_trait(item: &ItemTrait, path: &Path) -> Option<SchemaType> {
    let (attr, kind) = item
        .attrs
        .iter()
        .find_map(|attr| schema_kind(attr).map(|kind| (attr, kind)))?;

    let name = item.ident.to_string();
    let mut issues = Vec::new();

    let label = match schema_label(attr) {
        Ok(label) => label.unwrap_or_else(|| default_label(&name)),
        Err(err) => {
            issues.push(SchemaIssue::InvalidMarker {
                method: format!("#[{}]", kind.attr_name()),
                message: err.to_string(),
            });
            default_label(&name)
        }
    };

    let supertraits = item
        .supertraits
        .iter()
        .filter_map(|bound| match bound {
            TypeParamBound::Trait(bound) => {
                bound.path.segments.last().map(|s| s.ident.to_string())
            }
            _ => None,
        })
        .collect();

    let mut methods = Vec::new();
    for trait_item in &item.items {
        match trait_item {
            TraitItem::Fn(method) => {
                let markers = match parse_markers(&method.attrs) {
                    Ok(markers) => markers,
                    Err(err) => {
                        issues.push(SchemaIssue::InvalidMarker {
                            method: method.sig.ident.to_string(),
                            message: err.to_string(),
                        });
                        Markers::default()
                    }
                };
                methods.push(AccessorDeclaration {
                    owner: name.clone(),
                    sig: method.sig.clone(),
                    markers,
                    is_abstract: method.default.is_none(),
                });
            }
            TraitItem::Const(item) if item.default.is_none() => {
                issues.push(SchemaIssue::UnsupportedItem {
                    item: format!("associated constant `{}`", item.ident),
                });
            }
            TraitItem::Type(item) if item.default.is_none() => {
                issues.push(SchemaIssue::UnsupportedItem {
                    item: format!("associated type `{}`", item.ident),
                });
            }
            _ => {}
        }
    }

    debug!(schema = %name, %kind, %label, methods = methods.len(), "extracted schema");

    Some(SchemaType {
        name,
        label,
        kind,
        supertraits,
        methods,
        issues,
        source: path.to_path_buf(),
    })
}

fn schema_label(attr: &Attribute) -> syn::Result<Option<String>> {
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(None);
    }
    let mut label = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("label") {
            let value: LitStr = meta.value()?.parse()?;
            label = Some(value.value());
            Ok(())
        } else {
            Err(meta.error("unknown schema option, expected `label`"))
        }
    })?;
    Ok(label)
}

/// Parses the accessor markers of one method.
pub fn parse_markers(attrs: &[Attribute]) -> syn::Result<Markers> {
    let mut markers = Markers::default();

    for attr in attrs {
        let path = attr.path();
        if path.is_ident("property") {
            if !matches!(attr.meta, Meta::Path(_)) {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("hidden") {
                        markers.hidden = true;
                        Ok(())
                    } else {
                        Err(meta.error("unknown property option, expected `hidden`"))
                    }
                })?;
            }
        } else if path.is_ident("linked_vertex") {
            markers.linked_vertex = Some(parse_link(attr)?);
        } else if path.is_ident("linked_edge") {
            markers.linked_edge = Some(parse_link(attr)?);
        } else if path.is_ident("inbound") {
            attr.meta.require_path_only()?;
            markers.inbound = true;
        }
    }

    Ok(markers)
}

fn parse_link(attr: &Attribute) -> syn::Result<LinkMarker> {
    let mut link = LinkMarker::default();
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(link);
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("label") {
            let value: LitStr = meta.value()?.parse()?;
            link.label = Some(value.value());
        } else if meta.path.is_ident("direction") {
            let value: Ident = meta.value()?.parse()?;
            link.direction = Some(match value.to_string().as_str() {
                "In" => Direction::In,
                "Out" => Direction::Out,
                other => {
                    return Err(syn::Error::new(
                        value.span(),
                        format!("unknown direction `{other}`, expected `In` or `Out`"),
                    ));
                }
            });
        } else {
            return Err(meta.error("unknown relationship option, expected `label` or `direction`"));
        }
        Ok(())
    })?;
    Ok(link)
}

/// Collects the abstract accessors a schema's adapter must implement.
///
/// The schema's own abstract methods come first, followed by those of each
/// ancestor along the first-schema-supertrait chain. A method redeclared in
/// a subtrait appears once per declaring trait.
pub fn collect_accessors<'a>(
    catalog: &'a Catalog,
    schema: &'a SchemaType,
) -> Vec<&'a AccessorDeclaration> {
    catalog
        .chain(schema)
        .into_iter()
        .flat_map(|ancestor| ancestor.abstract_methods())
        .collect()
}
