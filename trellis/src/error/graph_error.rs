//! Errors raised by the in-memory graph store.

use thiserror::Error;

use crate::graph::ElementId;

/// Errors from graph store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// An element with the requested id already exists.
    #[error("Element id {0} is already in use")]
    DuplicateId(ElementId),
}
