//! Implementation of the `#[vertex]` and `#[edge]` attribute macros.

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{Error, ItemTrait, LitStr, Result, TraitItem, parse2, spanned::Spanned};

use crate::markers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Vertex,
    Edge,
}

impl SchemaKind {
    fn attr_name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Edge => "edge",
        }
    }
}

/// Checks the arguments of `#[vertex(...)]` / `#[edge(...)]`.
///
/// The label itself is read by the generator from source.
fn validate_args(attr: TokenStream) -> Result<()> {
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("label") {
            let value: LitStr = meta.value()?.parse()?;
            if value.value().is_empty() {
                return Err(Error::new(value.span(), "schema label cannot be empty"));
            }
            Ok(())
        } else {
            Err(meta.error(format!(
                "unknown schema option: `{}`. Expected: label",
                meta.path.get_ident().map(|i| i.to_string()).unwrap_or_default()
            )))
        }
    });
    syn::parse::Parser::parse2(parser, attr)
}

pub fn schema_impl(kind: SchemaKind, attr: TokenStream, item: TokenStream) -> TokenStream {
    match expand(kind, attr, item) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(kind: SchemaKind, attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    validate_args(attr)?;

    let mut schema: ItemTrait = parse2(item).map_err(|err| {
        Error::new(
            err.span(),
            format!("#[{}] can only be applied to trait declarations", kind.attr_name()),
        )
    })?;

    if schema.supertraits.is_empty() {
        let expected = match kind {
            SchemaKind::Vertex => "FramedVertex or another vertex schema",
            SchemaKind::Edge => "FramedEdge or another edge schema",
        };
        return Err(Error::new(
            schema.ident.span(),
            format!("schema trait `{}` must extend {expected}", schema.ident),
        ));
    }

    for item in &mut schema.items {
        match item {
            TraitItem::Fn(method) => {
                markers::validate(&method.attrs)?;
                method.attrs.retain(|attr| !markers::is_marker(attr));
            }
            TraitItem::Const(item) => reject_markers(&item.attrs)?,
            TraitItem::Type(item) => reject_markers(&item.attrs)?,
            _ => {}
        }
    }

    Ok(schema.into_token_stream())
}

fn reject_markers(attrs: &[syn::Attribute]) -> Result<()> {
    match attrs.iter().find(|attr| markers::is_marker(attr)) {
        Some(attr) => Err(Error::new(
            attr.span(),
            "accessor markers are only allowed on trait methods",
        )),
        None => Ok(()),
    }
}
