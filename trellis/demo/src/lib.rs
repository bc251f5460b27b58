//! A small social graph declared as trellis schema traits.
//!
//! The adapters (`PersonImpl`, `KnowsImpl`, ...) are generated by the build
//! script and included into [`schema`].
//!
//! ## Examples
//!
//! ```rust
//! use trellis::FramedGraph;
//! use trellis_demo::{Person, adapter_registry};
//!
//! let graph = FramedGraph::open(adapter_registry());
//! let ada = graph.add_vertex::<dyn Person>().unwrap();
//! ada.set_name(Some("Ada".to_string()));
//! assert_eq!(ada.get_name().as_deref(), Some("Ada"));
//! assert_eq!(ada.get_age(), 0);
//! ```

pub mod schema;

pub use schema::{Employee, Knows, Person, Software, adapter_registry, register_adapters};
