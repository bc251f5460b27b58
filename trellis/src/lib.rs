//! Runtime support for trellis-generated graph adapters.
//!
//! Schema traits are declared with the [`vertex`] and [`edge`] attribute
//! macros; `trellis-gen` turns them into adapter types at build time. The
//! adapters read and write through the in-memory [`Graph`] and are created
//! by a [`FramedGraph`], which looks them up in a [`Registry`].
//!
//! ## Examples
//!
//! ```rust
//! use trellis::{Direction, Graph, hide};
//!
//! let graph = Graph::new();
//! let ada = graph.add_vertex("person");
//! ada.set_property(&hide("acl"), "private");
//! assert!(ada.keys().is_empty());
//! assert_eq!(ada.hidden_keys(), vec!["~acl".to_string()]);
//! assert!(ada.adjacent_vertex(Direction::Out).is_none());
//! ```

pub mod error;
pub mod framed;
pub mod graph;
pub mod registry;
pub mod value;

pub use error::{FramingError, GraphError};
pub use framed::{FramedEdge, FramedElement, FramedGraph, FramedVertex};
pub use graph::{Direction, Edge, ElementId, Graph, HIDDEN_PREFIX, Vertex, hide, is_hidden, unhide};
pub use registry::{EdgeFactory, EntityKind, Registry, VertexFactory};
pub use value::{FromValue, Value};

pub use trellis_macros::{edge, vertex};
