//! Schema model extracted from source.
//!
//! A [`Catalog`] holds every schema trait discovered in one batch, in
//! discovery order. Each [`SchemaType`] keeps its method declarations as
//! written, with the accessor markers already parsed.

use std::fmt;
use std::path::PathBuf;

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{ReturnType, Signature};

use crate::errors::GeneratorError;

/// Whether a schema trait describes vertices or edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Vertex,
    Edge,
}

impl EntityKind {
    /// The attribute name that declares this kind (`vertex` / `edge`).
    pub fn attr_name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Edge => "edge",
        }
    }

    /// The adapter field holding the wrapped element.
    pub fn field_name(self) -> &'static str {
        self.attr_name()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attr_name())
    }
}

/// Traversal direction named in a relationship marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Out,
    In,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Out => f.write_str("Out"),
            Self::In => f.write_str("In"),
        }
    }
}

/// Arguments of `#[linked_vertex(..)]` or `#[linked_edge(..)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMarker {
    pub label: Option<String>,
    pub direction: Option<Direction>,
}

/// The accessor markers found on one method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    /// `#[property(hidden)]`
    pub hidden: bool,
    pub linked_vertex: Option<LinkMarker>,
    pub linked_edge: Option<LinkMarker>,
    /// `#[inbound]`
    pub inbound: bool,
}

/// One method declared by a schema trait.
#[derive(Debug, Clone)]
pub struct AccessorDeclaration {
    /// Name of the declaring trait.
    pub owner: String,
    pub sig: Signature,
    pub markers: Markers,
    /// `true` when the method has no default body.
    pub is_abstract: bool,
}

impl AccessorDeclaration {
    pub fn name(&self) -> String {
        self.sig.ident.to_string()
    }

    /// Renders the accessor as `Owner::method(params) -> Ret` for diagnostics.
    pub fn descriptor(&self) -> String {
        let inputs = render_tokens(self.sig.inputs.to_token_stream());
        let output = match &self.sig.output {
            ReturnType::Default => String::new(),
            ReturnType::Type(_, ty) => format!(" -> {}", render_tokens(ty.to_token_stream())),
        };
        format!("{}::{}({}){}", self.owner, self.sig.ident, inputs, output)
    }
}

/// A problem found while extracting a schema that only fails that schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    InvalidMarker { method: String, message: String },
    UnsupportedItem { item: String },
}

impl SchemaIssue {
    pub fn into_error(self, schema: &str) -> GeneratorError {
        match self {
            Self::InvalidMarker { method, message } => GeneratorError::InvalidMarker {
                schema: schema.to_string(),
                method,
                message,
            },
            Self::UnsupportedItem { item } => GeneratorError::UnsupportedItem {
                schema: schema.to_string(),
                item,
            },
        }
    }
}

/// A declared vertex or edge schema trait.
#[derive(Debug, Clone)]
pub struct SchemaType {
    pub name: String,
    pub label: String,
    pub kind: EntityKind,
    /// Simple names of the declared supertraits, in declaration order.
    pub supertraits: Vec<String>,
    /// Every method of the trait, abstract or not, in source order.
    pub methods: Vec<AccessorDeclaration>,
    pub issues: Vec<SchemaIssue>,
    /// The file the schema was found in.
    pub source: PathBuf,
}

impl SchemaType {
    pub fn abstract_methods(&self) -> impl Iterator<Item = &AccessorDeclaration> {
        self.methods.iter().filter(|method| method.is_abstract)
    }
}

/// Every schema type of one batch, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    schemas: Vec<SchemaType>,
}

impl Catalog {
    pub fn new(schemas: Vec<SchemaType>) -> Self {
        Self { schemas }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.schemas.iter().find(|schema| schema.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaType> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// The first declared supertrait that is itself a schema type.
    pub fn parent(&self, schema: &SchemaType) -> Option<&SchemaType> {
        schema.supertraits.iter().find_map(|name| self.get(name))
    }

    /// The schema followed by its ancestors along the first-schema-supertrait
    /// chain. A cycle ends the walk at the first repeated trait.
    pub fn chain<'a>(&'a self, schema: &'a SchemaType) -> Vec<&'a SchemaType> {
        let mut chain = vec![schema];
        let mut current = schema;
        while let Some(parent) = self.parent(current) {
            if chain.iter().any(|seen| seen.name == parent.name) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a SchemaType;
    type IntoIter = std::slice::Iter<'a, SchemaType>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemas.iter()
    }
}

/// Renders tokens as compact source text (`&dyn Person`, `Vec<Box<dyn Person>>`).
pub fn render_tokens(tokens: TokenStream) -> String {
    let mut text = tokens.to_string();
    for (from, to) in [
        (" :: ", "::"),
        (":: ", "::"),
        (" : ", ": "),
        ("& ", "&"),
        (" ,", ","),
        ("< ", "<"),
        (" <", "<"),
        (" >", ">"),
        ("( ", "("),
        (" )", ")"),
        ("[ ", "["),
        (" ]", "]"),
    ] {
        text = text.replace(from, to);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{catalog_from, declaration};

    #[test]
    fn descriptor_renders_compact_signature() {
        let decl = declaration("Person", quote::quote! {
            fn get_knows(&self, person: &dyn Person) -> bool;
        });
        assert_eq!(
            decl.descriptor(),
            "Person::get_knows(&self, person: &dyn Person) -> bool"
        );
    }

    #[test]
    fn descriptor_renders_nested_generics() {
        let decl = declaration("Person", quote::quote! {
            fn get_friends(&self) -> std::collections::HashSet<Box<dyn Person>>;
        });
        assert_eq!(
            decl.descriptor(),
            "Person::get_friends(&self) -> std::collections::HashSet<Box<dyn Person>>"
        );
    }

    #[test]
    fn descriptor_without_return_type() {
        let decl = declaration("Person", quote::quote! {
            fn set_age(&self, age: i32);
        });
        assert_eq!(decl.descriptor(), "Person::set_age(&self, age: i32)");
    }

    #[test]
    fn chain_follows_first_schema_supertrait() {
        let catalog = catalog_from(
            r#"
            #[vertex]
            pub trait Person: FramedVertex {}

            #[vertex]
            pub trait Employee: std::fmt::Debug + Person {}

            #[vertex]
            pub trait Manager: Employee {}
            "#,
        );
        let manager = catalog.get("Manager").unwrap();
        let names: Vec<_> = catalog.chain(manager).iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["Manager", "Employee", "Person"]);
    }

    #[test]
    fn chain_stops_at_cycles() {
        let catalog = catalog_from(
            r#"
            #[vertex]
            pub trait A: B {}

            #[vertex]
            pub trait B: A {}
            "#,
        );
        let a = catalog.get("A").unwrap();
        let names: Vec<_> = catalog.chain(a).iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
