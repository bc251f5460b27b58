//! In-memory property graph.
//!
//! This is the element-level API that generated adapters call into:
//! labelled vertices and edges, key/value properties (with a hidden-key
//! transform), and label-filtered traversal in either direction.
//!
//! [`Graph`], [`Vertex`] and [`Edge`] are all cheap handles onto the same
//! shared store, a `petgraph` stable graph behind a lock; cloning one never
//! copies graph data.
//!
//! ## Examples
//!
//! ```rust
//! use trellis::{Direction, Graph};
//!
//! let graph = Graph::new();
//! let ada = graph.add_vertex("person");
//! let charles = graph.add_vertex("person");
//! ada.set_property("name", "Ada");
//! ada.add_edge("knows", &charles);
//!
//! assert_eq!(ada.property::<String>("name").as_deref(), Some("Ada"));
//! assert_eq!(ada.vertices(Direction::Out, "knows"), vec![charles]);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use tracing::trace;

use crate::error::GraphError;
use crate::value::{FromValue, Value};

/// Prefix that marks a property key as hidden.
pub const HIDDEN_PREFIX: &str = "~";

/// Transforms a property key into its hidden form.
///
/// Hidden properties are stored under the transformed key and are left out
/// of [`Vertex::keys`] / [`Edge::keys`].
///
/// ```rust
/// assert_eq!(trellis::hide("acl"), "~acl");
/// ```
pub fn hide(key: &str) -> String {
    format!("{HIDDEN_PREFIX}{key}")
}

/// Returns `true` if the key is in hidden form.
pub fn is_hidden(key: &str) -> bool {
    key.starts_with(HIDDEN_PREFIX)
}

/// Strips the hidden prefix from a key, if present.
pub fn unhide(key: &str) -> &str {
    key.strip_prefix(HIDDEN_PREFIX).unwrap_or(key)
}

/// Identifier of a vertex or edge, unique within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for ElementId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traversal orientation relative to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow edges leaving the element.
    Out,
    /// Follow edges arriving at the element.
    In,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Out => Self::In,
            Self::In => Self::Out,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Out => f.write_str("out"),
            Self::In => f.write_str("in"),
        }
    }
}

impl From<Direction> for petgraph::Direction {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Out => petgraph::Direction::Outgoing,
            Direction::In => petgraph::Direction::Incoming,
        }
    }
}

#[derive(Debug)]
struct VertexRecord {
    id: ElementId,
    label: Arc<str>,
    properties: BTreeMap<String, Value>,
}

#[derive(Debug)]
struct EdgeRecord {
    id: ElementId,
    label: Arc<str>,
    properties: BTreeMap<String, Value>,
}

/// An edge as seen from one of its endpoints.
struct EdgeView<'a> {
    record: &'a EdgeRecord,
    out_vertex: ElementId,
    in_vertex: ElementId,
}

/// Element records live in a petgraph `StableGraph`; ids map to its indices
/// so explicit ids and removals never renumber elements.
#[derive(Debug, Default)]
struct Store {
    next_id: u64,
    graph: StableDiGraph<VertexRecord, EdgeRecord>,
    vertices: BTreeMap<ElementId, NodeIndex>,
    edges: BTreeMap<ElementId, EdgeIndex>,
}

#[derive(Debug, Clone, Copy)]
enum ElementKey {
    Vertex(ElementId),
    Edge(ElementId),
}

impl Store {
    fn allocate_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    fn reserve_id(&mut self, id: ElementId) -> Result<(), GraphError> {
        if self.vertices.contains_key(&id) || self.edges.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        self.next_id = self.next_id.max(id.0 + 1);
        Ok(())
    }

    fn insert_vertex(&mut self, id: ElementId, label: Arc<str>) {
        let index = self.graph.add_node(VertexRecord {
            id,
            label,
            properties: BTreeMap::new(),
        });
        self.vertices.insert(id, index);
    }

    fn insert_edge(&mut self, id: ElementId, label: Arc<str>, from: ElementId, to: ElementId) {
        let (Some(&from), Some(&to)) = (self.vertices.get(&from), self.vertices.get(&to)) else {
            return;
        };
        let index = self.graph.add_edge(
            from,
            to,
            EdgeRecord {
                id,
                label,
                properties: BTreeMap::new(),
            },
        );
        self.edges.insert(id, index);
    }

    fn vertex(&self, id: ElementId) -> Option<&VertexRecord> {
        self.graph.node_weight(*self.vertices.get(&id)?)
    }

    fn edge(&self, id: ElementId) -> Option<EdgeView<'_>> {
        let index = *self.edges.get(&id)?;
        let (from, to) = self.graph.edge_endpoints(index)?;
        Some(EdgeView {
            record: self.graph.edge_weight(index)?,
            out_vertex: self.graph.node_weight(from)?.id,
            in_vertex: self.graph.node_weight(to)?.id,
        })
    }

    fn properties(&self, key: ElementKey) -> Option<&BTreeMap<String, Value>> {
        match key {
            ElementKey::Vertex(id) => self.vertex(id).map(|r| &r.properties),
            ElementKey::Edge(id) => self
                .graph
                .edge_weight(*self.edges.get(&id)?)
                .map(|r| &r.properties),
        }
    }

    fn properties_mut(&mut self, key: ElementKey) -> Option<&mut BTreeMap<String, Value>> {
        match key {
            ElementKey::Vertex(id) => self
                .graph
                .node_weight_mut(*self.vertices.get(&id)?)
                .map(|r| &mut r.properties),
            ElementKey::Edge(id) => self
                .graph
                .edge_weight_mut(*self.edges.get(&id)?)
                .map(|r| &mut r.properties),
        }
    }

    /// Edges incident to `vertex` in `direction`, in creation order.
    fn incident_edges(&self, vertex: ElementId, direction: Direction) -> Vec<EdgeView<'_>> {
        let Some(&index) = self.vertices.get(&vertex) else {
            return Vec::new();
        };
        let mut edges: Vec<EdgeView<'_>> = self
            .graph
            .edges_directed(index, direction.into())
            .filter_map(|edge| {
                Some(EdgeView {
                    record: edge.weight(),
                    out_vertex: self.graph.node_weight(edge.source())?.id,
                    in_vertex: self.graph.node_weight(edge.target())?.id,
                })
            })
            .collect();
        edges.sort_by_key(|edge| edge.record.id);
        edges
    }
}

/// Handle onto a shared in-memory property graph.
#[derive(Clone, Default)]
pub struct Graph {
    store: Arc<RwLock<Store>>,
}

impl Graph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn same_graph(&self, other: &Graph) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    /// Adds a vertex with the given label and a freshly allocated id.
    pub fn add_vertex(&self, label: &str) -> Vertex {
        let label: Arc<str> = Arc::from(label);
        let id = {
            let mut store = self.write();
            let id = store.allocate_id();
            store.insert_vertex(id, label.clone());
            id
        };
        trace!(%id, %label, "added vertex");
        Vertex {
            id,
            label,
            graph: self.clone(),
        }
    }

    /// Adds a vertex with a caller-chosen id.
    ///
    /// ## Errors
    ///
    /// Returns [`GraphError::DuplicateId`] if any element already uses `id`.
    pub fn add_vertex_with_id(&self, id: ElementId, label: &str) -> Result<Vertex, GraphError> {
        let label: Arc<str> = Arc::from(label);
        {
            let mut store = self.write();
            store.reserve_id(id)?;
            store.insert_vertex(id, label.clone());
        }
        trace!(%id, %label, "added vertex with explicit id");
        Ok(Vertex {
            id,
            label,
            graph: self.clone(),
        })
    }

    /// Looks up a vertex by id.
    pub fn vertex(&self, id: ElementId) -> Option<Vertex> {
        let label = self.read().vertex(id)?.label.clone();
        Some(Vertex {
            id,
            label,
            graph: self.clone(),
        })
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: ElementId) -> Option<Edge> {
        let store = self.read();
        let edge = self.edge_handle(store.edge(id)?);
        Some(edge)
    }

    /// All vertices, in id order.
    pub fn vertices(&self) -> Vec<Vertex> {
        let store = self.read();
        store
            .vertices
            .keys()
            .filter_map(|id| store.vertex(*id))
            .map(|record| Vertex {
                id: record.id,
                label: record.label.clone(),
                graph: self.clone(),
            })
            .collect()
    }

    /// All vertices carrying `label`, in id order.
    pub fn vertices_with_label(&self, label: &str) -> Vec<Vertex> {
        self.vertices()
            .into_iter()
            .filter(|v| v.label() == label)
            .collect()
    }

    /// All edges carrying `label`, in id order.
    pub fn edges_with_label(&self, label: &str) -> Vec<Edge> {
        let store = self.read();
        store
            .edges
            .keys()
            .filter_map(|id| store.edge(*id))
            .filter(|edge| &*edge.record.label == label)
            .map(|edge| self.edge_handle(edge))
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.read().graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.read().graph.edge_count()
    }

    fn edge_handle(&self, edge: EdgeView<'_>) -> Edge {
        Edge {
            id: edge.record.id,
            label: edge.record.label.clone(),
            out_vertex: edge.out_vertex,
            in_vertex: edge.in_vertex,
            graph: self.clone(),
        }
    }

    fn property<T: FromValue>(&self, element: ElementKey, key: &str) -> Option<T> {
        let store = self.read();
        let value = store.properties(element)?.get(key)?;
        T::from_value(value)
    }

    fn set_property(&self, element: ElementKey, key: &str, value: Value) {
        trace!(?element, key, %value, "set property");
        if let Some(properties) = self.write().properties_mut(element) {
            properties.insert(key.to_string(), value);
        }
    }

    fn remove_property(&self, element: ElementKey, key: &str) -> Option<Value> {
        trace!(?element, key, "remove property");
        self.write().properties_mut(element)?.remove(key)
    }

    fn keys(&self, element: ElementKey, hidden: bool) -> Vec<String> {
        let store = self.read();
        store
            .properties(element)
            .map(|properties| {
                properties
                    .keys()
                    .filter(|key| is_hidden(key) == hidden)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.read();
        f.debug_struct("Graph")
            .field("vertices", &store.graph.node_count())
            .field("edges", &store.graph.edge_count())
            .finish()
    }
}

// Property access is identical for vertices and edges apart from the key.
macro_rules! element_properties {
    ($handle:ident, $key:ident) => {
        impl $handle {
            pub fn id(&self) -> ElementId {
                self.id
            }

            pub fn label(&self) -> &str {
                &self.label
            }

            /// The graph this element belongs to.
            pub fn graph(&self) -> &Graph {
                &self.graph
            }

            /// Reads a property, or `None` if it is absent or has another type.
            pub fn property<T: FromValue>(&self, key: &str) -> Option<T> {
                self.graph.property(ElementKey::$key(self.id), key)
            }

            /// Writes a property, replacing any previous value.
            pub fn set_property(&self, key: &str, value: impl Into<Value>) {
                self.graph
                    .set_property(ElementKey::$key(self.id), key, value.into())
            }

            /// Removes a property, returning its previous value.
            pub fn remove_property(&self, key: &str) -> Option<Value> {
                self.graph.remove_property(ElementKey::$key(self.id), key)
            }

            /// Visible property keys, in key order.
            pub fn keys(&self) -> Vec<String> {
                self.graph.keys(ElementKey::$key(self.id), false)
            }

            /// Hidden property keys (still in hidden form), in key order.
            pub fn hidden_keys(&self) -> Vec<String> {
                self.graph.keys(ElementKey::$key(self.id), true)
            }
        }

        impl PartialEq for $handle {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id && self.graph.same_graph(&other.graph)
            }
        }

        impl Eq for $handle {}

        impl Hash for $handle {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }
    };
}

/// Handle onto one vertex.
#[derive(Clone)]
pub struct Vertex {
    id: ElementId,
    label: Arc<str>,
    graph: Graph,
}

element_properties!(Vertex, Vertex);

impl Vertex {
    /// Adds an edge from this vertex to `to`.
    ///
    /// Both vertices must belong to the same graph.
    pub fn add_edge(&self, label: &str, to: &Vertex) -> Edge {
        debug_assert!(
            self.graph.same_graph(&to.graph),
            "edges can only connect vertices of the same graph"
        );
        let label: Arc<str> = Arc::from(label);
        let id = {
            let mut store = self.graph.write();
            let id = store.allocate_id();
            store.insert_edge(id, label.clone(), self.id, to.id);
            id
        };
        trace!(%id, %label, from = %self.id, to = %to.id, "added edge");
        Edge {
            id,
            label,
            out_vertex: self.id,
            in_vertex: to.id,
            graph: self.graph.clone(),
        }
    }

    /// Edges in `direction` carrying `label`, in insertion order.
    pub fn edges(&self, direction: Direction, label: &str) -> Vec<Edge> {
        let store = self.graph.read();
        store
            .incident_edges(self.id, direction)
            .into_iter()
            .filter(|edge| &*edge.record.label == label)
            .map(|edge| self.graph.edge_handle(edge))
            .collect()
    }

    /// Vertices reached over edges in `direction` carrying `label`.
    pub fn vertices(&self, direction: Direction, label: &str) -> Vec<Vertex> {
        self.edges(direction, label)
            .iter()
            .filter_map(|edge| edge.adjacent_vertex(direction.opposite()))
            .collect()
    }

    /// The vertex across the first edge in `direction`, whatever its label.
    pub fn adjacent_vertex(&self, direction: Direction) -> Option<Vertex> {
        let (other, label) = {
            let store = self.graph.read();
            let edge = store.incident_edges(self.id, direction).into_iter().next()?;
            let other = match direction {
                Direction::Out => edge.in_vertex,
                Direction::In => edge.out_vertex,
            };
            (other, store.vertex(other)?.label.clone())
        };
        Some(Vertex {
            id: other,
            label,
            graph: self.graph.clone(),
        })
    }
}

impl fmt::Debug for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v[{}]", self.id)
    }
}

/// Handle onto one edge.
#[derive(Clone)]
pub struct Edge {
    id: ElementId,
    label: Arc<str>,
    out_vertex: ElementId,
    in_vertex: ElementId,
    graph: Graph,
}

element_properties!(Edge, Edge);

impl Edge {
    /// The vertex this edge leaves.
    pub fn out_vertex(&self) -> Option<Vertex> {
        self.graph.vertex(self.out_vertex)
    }

    /// The vertex this edge arrives at.
    pub fn in_vertex(&self) -> Option<Vertex> {
        self.graph.vertex(self.in_vertex)
    }

    /// The endpoint on the given side: `Out` is the vertex the edge leaves,
    /// `In` the vertex it arrives at.
    pub fn adjacent_vertex(&self, direction: Direction) -> Option<Vertex> {
        match direction {
            Direction::Out => self.out_vertex(),
            Direction::In => self.in_vertex(),
        }
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e[{}][{}-{}->{}]", self.id, self.out_vertex, self.label, self.in_vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_get_increasing_ids_and_keep_labels() {
        let graph = Graph::new();
        let a = graph.add_vertex("person");
        let b = graph.add_vertex("software");

        assert!(a.id() < b.id());
        assert_eq!(a.label(), "person");
        assert_eq!(graph.vertex(b.id()).map(|v| v.label().to_string()), Some("software".to_string()));
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn explicit_ids_are_reserved() {
        let graph = Graph::new();
        let v = graph.add_vertex_with_id(ElementId::new(10), "person").unwrap();
        assert_eq!(v.id(), ElementId::new(10));

        let duplicate = graph.add_vertex_with_id(ElementId::new(10), "person");
        assert_eq!(duplicate.unwrap_err(), GraphError::DuplicateId(ElementId::new(10)));

        // Allocation continues past the reserved id
        assert_eq!(graph.add_vertex("person").id(), ElementId::new(11));
    }

    #[test]
    fn property_write_read_remove() {
        let graph = Graph::new();
        let v = graph.add_vertex("person");

        assert_eq!(v.property::<i32>("age"), None);
        v.set_property("age", 36);
        assert_eq!(v.property::<i32>("age"), Some(36));
        v.set_property("age", 37);
        assert_eq!(v.property::<i32>("age"), Some(37));
        assert_eq!(v.remove_property("age"), Some(Value::I32(37)));
        assert_eq!(v.property::<i32>("age"), None);
    }

    #[test]
    fn hidden_keys_are_kept_apart() {
        let graph = Graph::new();
        let v = graph.add_vertex("person");
        v.set_property("name", "ada");
        v.set_property(&hide("acl"), "private");

        assert_eq!(v.keys(), vec!["name".to_string()]);
        assert_eq!(v.hidden_keys(), vec!["~acl".to_string()]);
        assert_eq!(v.property::<String>("acl"), None);
        assert_eq!(v.property::<String>(&hide("acl")).as_deref(), Some("private"));
        assert_eq!(unhide("~acl"), "acl");
        assert_eq!(unhide("acl"), "acl");
    }

    #[test]
    fn traversal_filters_by_label_and_direction() {
        let graph = Graph::new();
        let ada = graph.add_vertex("person");
        let charles = graph.add_vertex("person");
        let engine = graph.add_vertex("software");

        ada.add_edge("knows", &charles);
        ada.add_edge("created", &engine);
        charles.add_edge("created", &engine);

        assert_eq!(ada.vertices(Direction::Out, "knows"), vec![charles.clone()]);
        assert_eq!(charles.vertices(Direction::In, "knows"), vec![ada.clone()]);
        assert_eq!(engine.vertices(Direction::In, "created"), vec![ada.clone(), charles.clone()]);
        assert!(ada.vertices(Direction::In, "knows").is_empty());
        assert_eq!(ada.edges(Direction::Out, "created").len(), 1);
        assert_eq!(graph.edges_with_label("created").len(), 2);
    }

    #[test]
    fn adjacent_vertex_steps() {
        let graph = Graph::new();
        let ada = graph.add_vertex("person");
        let charles = graph.add_vertex("person");
        let knows = ada.add_edge("knows", &charles);

        assert_eq!(ada.adjacent_vertex(Direction::Out), Some(charles.clone()));
        assert_eq!(ada.adjacent_vertex(Direction::In), None);
        assert_eq!(knows.adjacent_vertex(Direction::Out), Some(ada.clone()));
        assert_eq!(knows.adjacent_vertex(Direction::In), Some(charles.clone()));
        assert_eq!(knows.out_vertex(), Some(ada));
        assert_eq!(knows.in_vertex(), Some(charles));
    }

    #[test]
    fn incident_edges_keep_creation_order() {
        let graph = Graph::new();
        let hub = graph.add_vertex("person");
        let spokes: Vec<_> = (0..4).map(|_| graph.add_vertex("person")).collect();
        for spoke in &spokes {
            hub.add_edge("knows", spoke);
        }
        spokes[2].add_edge("knows", &hub);
        spokes[0].add_edge("knows", &hub);

        assert_eq!(hub.vertices(Direction::Out, "knows"), spokes);
        assert_eq!(
            hub.vertices(Direction::In, "knows"),
            vec![spokes[2].clone(), spokes[0].clone()]
        );
        assert_eq!(hub.adjacent_vertex(Direction::Out), Some(spokes[0].clone()));
        assert_eq!(hub.adjacent_vertex(Direction::In), Some(spokes[2].clone()));
    }

    #[test]
    fn explicit_ids_and_edges_share_one_id_space() {
        let graph = Graph::new();
        let a = graph.add_vertex_with_id(ElementId::new(7), "person").unwrap();
        let b = graph.add_vertex("person");
        let e = a.add_edge("knows", &b);

        assert_eq!(b.id(), ElementId::new(8));
        assert_eq!(e.id(), ElementId::new(9));
        assert_eq!(
            graph.add_vertex_with_id(ElementId::new(9), "person").unwrap_err(),
            GraphError::DuplicateId(ElementId::new(9))
        );
        assert_eq!(graph.edge(e.id()).and_then(|e| e.in_vertex()), Some(b));
        assert_eq!((graph.vertex_count(), graph.edge_count()), (2, 1));
    }

    #[test]
    fn edge_properties() {
        let graph = Graph::new();
        let a = graph.add_vertex("person");
        let b = graph.add_vertex("person");
        let e = a.add_edge("knows", &b);

        e.set_property("weight", 0.5_f64);
        assert_eq!(e.property::<f64>("weight"), Some(0.5));
        assert_eq!(graph.edge(e.id()).and_then(|e| e.property::<f64>("weight")), Some(0.5));
    }

    #[test]
    fn handles_compare_by_id_within_one_graph() {
        let graph = Graph::new();
        let a = graph.add_vertex("person");
        let again = graph.vertex(a.id()).unwrap();
        assert_eq!(a, again);

        let other = Graph::new();
        let lookalike = other.add_vertex("person");
        assert_eq!(a.id(), lookalike.id());
        assert_ne!(a, lookalike);
    }

    #[test]
    fn direction_opposite_and_display() {
        assert_eq!(Direction::Out.opposite(), Direction::In);
        assert_eq!(Direction::In.to_string(), "in");
    }
}
