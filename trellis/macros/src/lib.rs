//! Schema declaration macros for trellis graph adapters.
//!
//! The macros mark a trait as a vertex or edge schema. They validate the
//! accessor markers inside the trait and strip them, so the trait compiles
//! as an ordinary trait; `trellis-gen` reads the same markers from source
//! to generate the adapter.
//!
//! ## Examples
//!
//! ```ignore
//! use trellis::{FramedVertex, vertex};
//!
//! #[vertex]
//! pub trait Person: FramedVertex {
//!     fn get_name(&self) -> Option<String>;
//!     fn set_name(&self, name: Option<String>);
//!
//!     #[property(hidden)]
//!     fn get_acl(&self) -> String;
//!
//!     #[linked_vertex(label = "knows")]
//!     fn get_knows_people(&self) -> Vec<Box<dyn Person>>;
//! }
//! ```

use proc_macro::TokenStream;

mod markers;
mod schema;

/// Declares a vertex schema trait.
///
/// ## Attributes
///
/// - `#[vertex]` - label defaults to the lowercased trait name
/// - `#[vertex(label = "...")]` - explicit element label
///
/// On accessor methods:
/// - `#[property(hidden)]` - store the property under a hidden key
/// - `#[linked_vertex(label = "...", direction = In|Out)]` - vertex relationship override
/// - `#[linked_edge(label = "...", direction = In|Out)]` - edge relationship override
/// - `#[inbound]` - follow the incoming edge for a single-valued vertex getter
#[proc_macro_attribute]
pub fn vertex(attr: TokenStream, item: TokenStream) -> TokenStream {
    schema::schema_impl(schema::SchemaKind::Vertex, attr.into(), item.into()).into()
}

/// Declares an edge schema trait.
///
/// Accepts the same arguments and accessor markers as [`vertex`].
#[proc_macro_attribute]
pub fn edge(attr: TokenStream, item: TokenStream) -> TokenStream {
    schema::schema_impl(schema::SchemaKind::Edge, attr.into(), item.into()).into()
}
