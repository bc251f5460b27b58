//! Shared test fixtures for trellis-gen tests.

use std::path::Path;

use proc_macro2::TokenStream;
use syn::TraitItemFn;

use crate::extract::{parse_markers, parse_source};
use crate::model::{AccessorDeclaration, Catalog};

/// A small social-graph schema: three vertex schemas and one edge schema.
///
/// `Person` declares one accessor of every supported kind, one unsupported
/// keyed getter and one concrete method. `Employee` extends `Person`.
pub const PERSON_SCHEMA: &str = r#"
use trellis::{FramedEdge, FramedVertex, edge, vertex};

#[vertex]
pub trait Person: FramedVertex {
    fn get_name(&self) -> Option<String>;
    fn set_name(&self, name: Option<String>);
    fn get_age(&self) -> i32;
    fn set_age(&self, age: i32);

    #[property(hidden)]
    fn get_acl(&self) -> String;

    #[linked_vertex(label = "knows")]
    fn get_knows_people(&self) -> Vec<Box<dyn Person>>;

    fn get_friends(&self) -> Vec<Box<dyn Person>>;
    fn add_friend(&self, friend: &dyn Person);

    #[linked_edge(label = "knows")]
    fn get_knows(&self) -> Vec<Box<dyn Knows>>;

    fn get_knows_person(&self, person: &dyn Person) -> bool;

    fn describe(&self) -> String {
        format!("{} ({})", self.get_name().unwrap_or_default(), self.get_age())
    }
}

#[vertex(label = "software")]
pub trait Software: FramedVertex {
    fn get_name(&self) -> Option<String>;
    fn set_name(&self, name: Option<String>);

    #[linked_vertex(label = "created", direction = In)]
    fn get_creators(&self) -> Vec<Box<dyn Person>>;
}

#[edge]
pub trait Knows: FramedEdge {
    fn get_weight(&self) -> f64;
    fn set_weight(&self, weight: f64);
    fn get_source(&self) -> Box<dyn Person>;

    #[inbound]
    fn get_target(&self) -> Box<dyn Person>;
}

#[vertex]
pub trait Employee: Person {
    fn get_salary(&self) -> Option<f64>;
    fn set_salary(&self, salary: Option<f64>);
}
"#;

/// Builds an accessor declaration from a trait method, markers included.
///
/// ## Examples
///
/// ```ignore
/// let decl = declaration("Person", quote! {
///     #[property(hidden)]
///     fn get_acl(&self) -> String;
/// });
/// assert!(decl.markers.hidden);
/// ```
pub fn declaration(owner: &str, tokens: TokenStream) -> AccessorDeclaration {
    let item: TraitItemFn = syn::parse2(tokens).expect("valid trait method");
    let markers = parse_markers(&item.attrs).expect("valid markers");
    AccessorDeclaration {
        owner: owner.to_string(),
        sig: item.sig,
        markers,
        is_abstract: item.default.is_none(),
    }
}

/// Parses schema source into a catalog.
pub fn catalog_from(source: &str) -> Catalog {
    Catalog::new(parse_source(source, Path::new("test.rs")).expect("valid schema source"))
}
