//! The framing façade: schema-typed views over graph elements.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::FramingError;
use crate::graph::{Edge, ElementId, Graph, Vertex};
use crate::registry::Registry;

/// An adapter over one graph element.
///
/// Every schema trait is a subtrait of [`FramedVertex`] or [`FramedEdge`],
/// which both extend this.
pub trait FramedElement: fmt::Display + fmt::Debug {
    /// The framed graph the adapter was created from.
    fn graph(&self) -> &FramedGraph;
}

/// An adapter over a vertex.
pub trait FramedVertex: FramedElement {
    fn vertex(&self) -> &Vertex;
}

/// An adapter over an edge.
pub trait FramedEdge: FramedElement {
    fn edge(&self) -> &Edge;
}

/// A graph paired with the adapter registry used to frame its elements.
///
/// Cloning is cheap; clones share both the graph and the registry.
#[derive(Clone)]
pub struct FramedGraph {
    graph: Graph,
    registry: Arc<Registry>,
}

impl FramedGraph {
    pub fn new(graph: Graph, registry: Registry) -> Self {
        Self {
            graph,
            registry: Arc::new(registry),
        }
    }

    /// Frames a fresh, empty graph.
    pub fn open(registry: Registry) -> Self {
        Self::new(Graph::new(), registry)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Adds a vertex labelled for schema `S` and frames it.
    ///
    /// ## Errors
    ///
    /// Fails if `S` has no registered vertex adapter.
    pub fn add_vertex<S: ?Sized + 'static>(&self) -> Result<Box<S>, FramingError> {
        let (label, factory) = self.registry.vertex_factory::<S>()?;
        let vertex = self.graph.add_vertex(label);
        debug!(id = %vertex.id(), label, "framed new vertex");
        Ok(factory(vertex, self.clone()))
    }

    /// Adds a vertex with an explicit id, labelled for schema `S`.
    ///
    /// ## Errors
    ///
    /// Fails if `S` has no registered vertex adapter or the id is taken.
    pub fn add_vertex_with_id<S: ?Sized + 'static>(
        &self,
        id: ElementId,
    ) -> Result<Box<S>, FramingError> {
        let (label, factory) = self.registry.vertex_factory::<S>()?;
        let vertex = self.graph.add_vertex_with_id(id, label)?;
        Ok(factory(vertex, self.clone()))
    }

    /// Adds an edge labelled for schema `S` from `out` to `into`.
    pub fn add_edge<S: ?Sized + 'static>(
        &self,
        out: &Vertex,
        into: &Vertex,
    ) -> Result<Box<S>, FramingError> {
        let (label, factory) = self.registry.edge_factory::<S>()?;
        let edge = out.add_edge(label, into);
        debug!(id = %edge.id(), label, "framed new edge");
        Ok(factory(edge, self.clone()))
    }

    /// Frames the vertex with the given id as schema `S`.
    pub fn vertex<S: ?Sized + 'static>(&self, id: ElementId) -> Result<Box<S>, FramingError> {
        let vertex = self.graph.vertex(id).ok_or(FramingError::NoSuchVertex(id))?;
        self.frame_vertex(vertex)
    }

    /// Frames the edge with the given id as schema `S`.
    pub fn edge<S: ?Sized + 'static>(&self, id: ElementId) -> Result<Box<S>, FramingError> {
        let edge = self.graph.edge(id).ok_or(FramingError::NoSuchEdge(id))?;
        self.frame_edge(edge)
    }

    /// Frames every vertex carrying the label registered for `S`.
    pub fn vertices<S: ?Sized + 'static>(&self) -> Result<Vec<Box<S>>, FramingError> {
        let (label, factory) = self.registry.vertex_factory::<S>()?;
        Ok(self
            .graph
            .vertices_with_label(label)
            .into_iter()
            .map(|vertex| factory(vertex, self.clone()))
            .collect())
    }

    /// Frames every edge carrying the label registered for `S`.
    pub fn edges<S: ?Sized + 'static>(&self) -> Result<Vec<Box<S>>, FramingError> {
        let (label, factory) = self.registry.edge_factory::<S>()?;
        Ok(self
            .graph
            .edges_with_label(label)
            .into_iter()
            .map(|edge| factory(edge, self.clone()))
            .collect())
    }

    /// Frames an existing vertex as schema `S`, whatever its label.
    pub fn frame_vertex<S: ?Sized + 'static>(&self, vertex: Vertex) -> Result<Box<S>, FramingError> {
        let (_, factory) = self.registry.vertex_factory::<S>()?;
        Ok(factory(vertex, self.clone()))
    }

    /// Frames an existing edge as schema `S`, whatever its label.
    pub fn frame_edge<S: ?Sized + 'static>(&self, edge: Edge) -> Result<Box<S>, FramingError> {
        let (_, factory) = self.registry.edge_factory::<S>()?;
        Ok(factory(edge, self.clone()))
    }
}

impl fmt::Debug for FramedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FramedGraph")
            .field("graph", &self.graph)
            .field("registry", &self.registry)
            .finish()
    }
}
