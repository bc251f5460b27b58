//! Errors raised while framing graph elements as schema adapters.

use thiserror::Error;

use super::GraphError;
use crate::graph::ElementId;
use crate::registry::EntityKind;

/// Errors from the framing façade.
///
/// These are the runtime side of the adapter contract: the generator ran at
/// build time, so a missing registration or an element of the wrong kind can
/// only surface here, at the point of use.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// No adapter has been registered for the requested schema type.
    #[error("No adapter registered for schema type `{type_name}`")]
    Unregistered {
        /// The Rust type name of the requested schema trait object.
        type_name: &'static str,
    },

    /// The schema type is registered for the other entity kind.
    #[error("Schema type `{schema}` frames {registered} elements, not {requested} elements")]
    EntityKindMismatch {
        /// The schema name given at registration.
        schema: &'static str,
        /// The kind the adapter was registered for.
        registered: EntityKind,
        /// The kind the caller asked for.
        requested: EntityKind,
    },

    /// No vertex with the given id exists.
    #[error("No vertex with id {0}")]
    NoSuchVertex(ElementId),

    /// No edge with the given id exists.
    #[error("No edge with id {0}")]
    NoSuchEdge(ElementId),

    /// The underlying graph rejected the operation.
    #[error("Graph operation failed: {0}")]
    Graph(#[from] GraphError),
}

impl FramingError {
    /// Returns `true` if the requested element does not exist.
    pub fn is_missing_element(&self) -> bool {
        matches!(self, Self::NoSuchVertex(_) | Self::NoSuchEdge(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_message_names_the_type() {
        let err = FramingError::Unregistered {
            type_name: "dyn demo::Person",
        };
        assert_eq!(
            err.to_string(),
            "No adapter registered for schema type `dyn demo::Person`"
        );
    }

    #[test]
    fn kind_mismatch_message_names_both_kinds() {
        let err = FramingError::EntityKindMismatch {
            schema: "Knows",
            registered: EntityKind::Edge,
            requested: EntityKind::Vertex,
        };
        assert_eq!(
            err.to_string(),
            "Schema type `Knows` frames edge elements, not vertex elements"
        );
    }

    #[test]
    fn missing_element_classification() {
        assert!(FramingError::NoSuchVertex(ElementId::new(3)).is_missing_element());
        assert!(FramingError::NoSuchEdge(ElementId::new(3)).is_missing_element());
        assert!(!FramingError::Graph(GraphError::DuplicateId(ElementId::new(1))).is_missing_element());
    }
}
