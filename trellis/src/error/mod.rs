//! Error types for the graph store and the framing layer.

mod framing_error;
mod graph_error;

pub use framing_error::FramingError;
pub use graph_error::GraphError;
