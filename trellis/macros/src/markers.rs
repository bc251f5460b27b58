//! Validation of the accessor markers allowed inside a schema trait.

use syn::{Attribute, Error, Ident, LitStr, Meta, Result, spanned::Spanned};

/// Marker attribute names recognised on schema accessors.
pub const MARKERS: [&str; 4] = ["property", "linked_vertex", "linked_edge", "inbound"];

pub fn is_marker(attr: &Attribute) -> bool {
    MARKERS.iter().any(|name| attr.path().is_ident(name))
}

/// Checks every marker on one accessor.
///
/// Rejects unknown keys, repeated markers, and `linked_vertex` combined with
/// `linked_edge`.
pub fn validate(attrs: &[Attribute]) -> Result<()> {
    let mut seen: Vec<&str> = Vec::new();

    for attr in attrs.iter().filter(|attr| is_marker(attr)) {
        let name = MARKERS
            .iter()
            .copied()
            .find(|name| attr.path().is_ident(name))
            .unwrap_or_default();

        if seen.contains(&name) {
            return Err(Error::new(attr.span(), format!("duplicate `#[{name}]` marker")));
        }
        seen.push(name);

        match name {
            "property" => validate_property(attr)?,
            "linked_vertex" | "linked_edge" => validate_link(attr)?,
            _ => validate_inbound(attr)?,
        }
    }

    if seen.contains(&"linked_vertex") && seen.contains(&"linked_edge") {
        let span = attrs
            .iter()
            .find(|attr| attr.path().is_ident("linked_edge"))
            .map(|attr| attr.span())
            .unwrap_or_else(proc_macro2::Span::call_site);
        return Err(Error::new(
            span,
            "`#[linked_vertex]` and `#[linked_edge]` cannot be combined",
        ));
    }

    Ok(())
}

fn validate_property(attr: &Attribute) -> Result<()> {
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(());
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("hidden") {
            Ok(())
        } else {
            Err(meta.error(format!(
                "unknown property option: `{}`. Expected: hidden",
                path_name(&meta.path)
            )))
        }
    })
}

fn validate_link(attr: &Attribute) -> Result<()> {
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(());
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("label") {
            let value: LitStr = meta.value()?.parse()?;
            if value.value().is_empty() {
                return Err(Error::new(value.span(), "edge label cannot be empty"));
            }
            Ok(())
        } else if meta.path.is_ident("direction") {
            let value: Ident = meta.value()?.parse()?;
            match value.to_string().as_str() {
                "In" | "Out" => Ok(()),
                other => Err(Error::new(
                    value.span(),
                    format!("unknown direction: `{other}`. Expected one of: In, Out"),
                )),
            }
        } else {
            Err(meta.error(format!(
                "unknown relationship option: `{}`. Expected one of: label, direction",
                path_name(&meta.path)
            )))
        }
    })
}

fn validate_inbound(attr: &Attribute) -> Result<()> {
    match &attr.meta {
        Meta::Path(_) => Ok(()),
        other => Err(Error::new(other.span(), "`#[inbound]` takes no arguments")),
    }
}

fn path_name(path: &syn::Path) -> String {
    path.get_ident().map(|i| i.to_string()).unwrap_or_default()
}
