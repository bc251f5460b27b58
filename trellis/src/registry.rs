//! Explicit adapter registry.
//!
//! Generated code registers one factory per schema type, keyed by the
//! schema trait object's [`TypeId`]. The framing façade looks factories up
//! here instead of searching for adapter types by name.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::FramingError;
use crate::framed::FramedGraph;
use crate::graph::{Edge, Vertex};

/// Whether a schema type frames vertices or edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Vertex,
    Edge,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Edge => f.write_str("edge"),
        }
    }
}

/// Builds a vertex adapter for schema type `S`.
pub type VertexFactory<S> = fn(Vertex, FramedGraph) -> Box<S>;

/// Builds an edge adapter for schema type `S`.
pub type EdgeFactory<S> = fn(Edge, FramedGraph) -> Box<S>;

struct Registration {
    schema: &'static str,
    label: &'static str,
    kind: EntityKind,
    // A `VertexFactory<S>` or `EdgeFactory<S>`, depending on `kind`.
    factory: Box<dyn Any + Send + Sync>,
}

/// Maps schema trait object types to adapter factories.
///
/// ## Examples
///
/// ```rust
/// use trellis::{FramedGraph, FramedVertex, Registry, Vertex};
///
/// pub trait Thing: FramedVertex {}
///
/// #[derive(Debug)]
/// struct ThingImpl { vertex: Vertex, graph: FramedGraph }
///
/// impl std::fmt::Display for ThingImpl {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "thing[{}]", self.vertex.id())
///     }
/// }
/// impl trellis::FramedElement for ThingImpl {
///     fn graph(&self) -> &FramedGraph { &self.graph }
/// }
/// impl FramedVertex for ThingImpl {
///     fn vertex(&self) -> &Vertex { &self.vertex }
/// }
/// impl Thing for ThingImpl {}
///
/// fn boxed(vertex: Vertex, graph: FramedGraph) -> Box<dyn Thing> {
///     Box::new(ThingImpl { vertex, graph })
/// }
///
/// let mut registry = Registry::new();
/// registry.register_vertex::<dyn Thing>("Thing", "thing", boxed);
/// assert_eq!(registry.label::<dyn Thing>(), Some("thing"));
/// ```
#[derive(Default)]
pub struct Registry {
    registrations: HashMap<TypeId, Registration>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the vertex adapter factory for schema type `S`.
    ///
    /// A second registration for the same type replaces the first.
    pub fn register_vertex<S: ?Sized + 'static>(
        &mut self,
        schema: &'static str,
        label: &'static str,
        factory: VertexFactory<S>,
    ) {
        self.insert::<S>(schema, label, EntityKind::Vertex, Box::new(factory));
    }

    /// Registers the edge adapter factory for schema type `S`.
    pub fn register_edge<S: ?Sized + 'static>(
        &mut self,
        schema: &'static str,
        label: &'static str,
        factory: EdgeFactory<S>,
    ) {
        self.insert::<S>(schema, label, EntityKind::Edge, Box::new(factory));
    }

    fn insert<S: ?Sized + 'static>(
        &mut self,
        schema: &'static str,
        label: &'static str,
        kind: EntityKind,
        factory: Box<dyn Any + Send + Sync>,
    ) {
        debug!(schema, label, %kind, "registering adapter");
        let previous = self.registrations.insert(
            TypeId::of::<S>(),
            Registration {
                schema,
                label,
                kind,
                factory,
            },
        );
        if previous.is_some() {
            debug!(schema, "replaced existing adapter registration");
        }
    }

    fn registration<S: ?Sized + 'static>(
        &self,
        requested: EntityKind,
    ) -> Result<&Registration, FramingError> {
        let registration =
            self.registrations
                .get(&TypeId::of::<S>())
                .ok_or(FramingError::Unregistered {
                    type_name: type_name::<S>(),
                })?;
        if registration.kind != requested {
            return Err(FramingError::EntityKindMismatch {
                schema: registration.schema,
                registered: registration.kind,
                requested,
            });
        }
        Ok(registration)
    }

    /// Looks up the vertex factory and label for `S`.
    ///
    /// ## Errors
    ///
    /// [`FramingError::Unregistered`] if `S` has no adapter, or
    /// [`FramingError::EntityKindMismatch`] if `S` is an edge schema.
    pub fn vertex_factory<S: ?Sized + 'static>(
        &self,
    ) -> Result<(&'static str, VertexFactory<S>), FramingError> {
        let registration = self.registration::<S>(EntityKind::Vertex)?;
        let factory = registration
            .factory
            .downcast_ref::<VertexFactory<S>>()
            .ok_or(FramingError::Unregistered {
                type_name: type_name::<S>(),
            })?;
        Ok((registration.label, *factory))
    }

    /// Looks up the edge factory and label for `S`.
    pub fn edge_factory<S: ?Sized + 'static>(
        &self,
    ) -> Result<(&'static str, EdgeFactory<S>), FramingError> {
        let registration = self.registration::<S>(EntityKind::Edge)?;
        let factory = registration
            .factory
            .downcast_ref::<EdgeFactory<S>>()
            .ok_or(FramingError::Unregistered {
                type_name: type_name::<S>(),
            })?;
        Ok((registration.label, *factory))
    }

    /// The element label registered for `S`.
    pub fn label<S: ?Sized + 'static>(&self) -> Option<&'static str> {
        self.registrations
            .get(&TypeId::of::<S>())
            .map(|registration| registration.label)
    }

    /// The entity kind registered for `S`.
    pub fn kind<S: ?Sized + 'static>(&self) -> Option<EntityKind> {
        self.registrations
            .get(&TypeId::of::<S>())
            .map(|registration| registration.kind)
    }

    pub fn contains<S: ?Sized + 'static>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<S>())
    }

    /// Registered schema names, sorted.
    pub fn schemas(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.registrations.values().map(|r| r.schema).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("schemas", &self.schemas())
            .finish()
    }
}
